use std::collections::VecDeque;

use chrono::Utc;
use clap::Parser;
use curator_core::{update, AppState, Msg, SearchStatus};
use curator_engine::EngineHandle;
use curator_logging::{curator_debug, curator_info};

use super::cli::Cli;
use super::config::{self, CuratorConfig};
use super::effects::{EffectRunner, SearchBackend};
use super::logging::{self, level_for_verbosity};
use super::records::load_records;
use super::render::render;

/// Query shown when classifying a records file without `--query`.
const OFFLINE_QUERY: &str = "offline records";

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into(), level_for_verbosity(cli.verbose));

    let mut config = config::load(&cli.config)?;
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }

    let backend = match &cli.records {
        Some(path) => SearchBackend::Offline(load_records(path)?),
        None => SearchBackend::Live {
            engine: EngineHandle::new(config.search.settings())?,
            timeout: config.search.timeout(),
        },
    };
    let query = cli
        .query
        .clone()
        .unwrap_or_else(|| OFFLINE_QUERY.to_string());

    let mut session = Session::new(EffectRunner::new(backend));
    session.dispatch_all([
        Msg::RuleDraftsRestored(config.rules.clone()),
        Msg::ModeSelected(config.mode),
        Msg::SearchOptionsChanged(config.search.options()),
        Msg::QueryChanged(query),
        Msg::SearchSubmitted,
    ]);

    if session.state.status() == &SearchStatus::Ready {
        session.dispatch(Msg::ApplyClicked { now: Utc::now() });
        session.dispatch_all(cli.toggles.iter().cloned().map(Msg::SelectionToggled));
        if cli.generate {
            session.dispatch(Msg::GenerateClicked);
        }
    }

    let view = session.state.view();
    curator_info!(
        "classified {} results in {} mode, {} selected",
        view.rows.len(),
        view.mode,
        view.selected_count
    );
    print!("{}", render(&view));
    for record_ids in session.runner.generation_requests() {
        println!("generate: {}", record_ids.join(", "));
    }

    if cli.save_config {
        let saved = CuratorConfig {
            mode: session.state.engine().mode(),
            rules: session.state.drafts().to_vec(),
            search: config.search,
        };
        config::save(&cli.config, &saved)?;
    }

    if let SearchStatus::Failed { message } = session.state.status() {
        anyhow::bail!("search failed: {message}");
    }
    Ok(())
}

/// Owns the state and feeds effect results back in until the queue drains.
struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch_all(&mut self, msgs: impl IntoIterator<Item = Msg>) {
        for msg in msgs {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            if state.consume_dirty() {
                let view = state.view();
                curator_debug!(
                    "state changed: status={:?} rows={} selected={}",
                    view.status,
                    view.rows.len(),
                    view.selected_count
                );
            }
            self.state = state;
            inbox.extend(self.runner.run(effects));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::{Mode, ResultRecord, RuleDraft};

    fn offline_session(records: Vec<ResultRecord>) -> Session {
        Session::new(EffectRunner::new(SearchBackend::Offline(records)))
    }

    #[test]
    fn offline_search_flows_through_classification_and_generation() {
        let records = vec![
            ResultRecord::new("ai", "AI in practice"),
            ResultRecord::new("other", "gardening tips"),
        ];
        let mut session = offline_session(records);
        session.dispatch_all([
            Msg::RuleDraftsRestored(vec![RuleDraft::new("text", "contains", "ai")]),
            Msg::ModeSelected(Mode::Heuristic),
            Msg::QueryChanged("offline".into()),
            Msg::SearchSubmitted,
            Msg::ApplyClicked { now: Utc::now() },
            Msg::SelectionToggled("other".into()),
            Msg::GenerateClicked,
        ]);

        assert_eq!(session.state.status(), &SearchStatus::Ready);
        assert_eq!(
            session.runner.generation_requests(),
            &[vec!["ai".to_string(), "other".to_string()]]
        );
    }
}
