use crate::{AppState, Effect, Msg, RuleDraft};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(query) => {
            state.set_query(query);
            Vec::new()
        }
        Msg::SearchOptionsChanged(options) => {
            state.set_options(options);
            Vec::new()
        }
        Msg::SearchSubmitted => match state.begin_search() {
            Some((request_id, request)) => vec![Effect::RunSearch {
                request_id,
                request,
            }],
            None => Vec::new(),
        },
        Msg::SearchCompleted {
            request_id,
            result,
            now,
        } => {
            state.finish_search(request_id, result, now);
            Vec::new()
        }
        Msg::ModeSelected(mode) => {
            state.select_mode(mode);
            Vec::new()
        }
        Msg::RuleAdded => {
            state.drafts_mut().push(RuleDraft::default());
            state.mark_dirty();
            Vec::new()
        }
        Msg::RuleFieldChanged { index, field } => {
            edit_draft(&mut state, index, |draft| draft.field = field);
            Vec::new()
        }
        Msg::RuleOperatorChanged { index, operator } => {
            edit_draft(&mut state, index, |draft| draft.operator = operator);
            Vec::new()
        }
        Msg::RuleValueChanged { index, value } => {
            edit_draft(&mut state, index, |draft| draft.value = value);
            Vec::new()
        }
        Msg::RuleDeleted { index } => {
            if index < state.drafts().len() {
                state.drafts_mut().remove(index);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RuleDraftsRestored(drafts) => {
            *state.drafts_mut() = drafts;
            state.mark_dirty();
            Vec::new()
        }
        Msg::ApplyClicked { now } => {
            state.apply_rules(now);
            Vec::new()
        }
        Msg::SelectionToggled(id) => {
            state.toggle_selection(&id);
            Vec::new()
        }
        Msg::GenerateClicked => {
            let record_ids = state.effective_selection();
            if record_ids.is_empty() {
                Vec::new()
            } else {
                vec![Effect::GenerateArticle { record_ids }]
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Replace one property of the draft at `index`; out-of-range edits are ignored.
fn edit_draft(state: &mut AppState, index: usize, edit: impl FnOnce(&mut RuleDraft)) {
    let mut changed = false;
    if let Some(draft) = state.drafts_mut().get_mut(index) {
        let before = draft.clone();
        edit(draft);
        changed = *draft != before;
    }
    if changed {
        state.mark_dirty();
    }
}
