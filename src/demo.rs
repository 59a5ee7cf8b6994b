//! Service demo scenario.
//!
//! A service starts at `initial`; one view attaches immediately, a timer
//! writes each configured update, and a second view attaches after the first
//! update to show replay of the current value.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::component::ViewBinding;
use crate::config::DemoConfig;
use crate::scheduler::set_after;
use crate::service::StateService;

/// What each view rendered, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoOutcome {
    pub early_view: Vec<String>,
    pub late_view: Vec<String>,
    pub completed: bool,
}

fn recording_view(
    name: &str,
    service: &StateService<String>,
) -> (ViewBinding<String>, Rc<RefCell<Vec<String>>>) {
    let rendered = Rc::new(RefCell::new(Vec::new()));
    let sink = rendered.clone();
    let view_name = name.to_string();
    let view = ViewBinding::attach(name, &service.value(), move |value: &String| {
        tracing::info!(view = %view_name, %value, "Rendered");
        sink.borrow_mut().push(value.clone());
    });
    (view, rendered)
}

/// Run the scenario to completion or until `shutdown` fires.
///
/// Must be called from within a `LocalSet`.
pub async fn run(config: &DemoConfig, mut shutdown: broadcast::Receiver<()>) -> DemoOutcome {
    let service = Rc::new(StateService::new("demo", config.initial.clone()));
    let interval = Duration::from_millis(config.delay_ms);

    let (mut early, early_rendered) = recording_view("early", &service);
    let mut late: Option<(ViewBinding<String>, Rc<RefCell<Vec<String>>>)> = None;
    let mut completed = true;

    for value in config.updates.iter().cloned() {
        let mut timer = set_after(service.clone(), value, interval);
        tokio::select! {
            result = &mut timer => match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "Demo update had failing views"),
                Err(e) => {
                    tracing::error!(error = %e, "Demo timer task failed");
                    completed = false;
                    break;
                }
            },
            _ = shutdown.recv() => {
                tracing::info!("Demo interrupted");
                timer.abort();
                completed = false;
                break;
            }
        }

        if late.is_none() {
            late = Some(recording_view("late", &service));
        }
    }

    early.detach();
    let late_view = match late {
        Some((mut view, rendered)) => {
            view.detach();
            let values = rendered.borrow().clone();
            values
        }
        None => Vec::new(),
    };

    let outcome = DemoOutcome {
        early_view: early_rendered.borrow().clone(),
        late_view,
        completed,
    };
    tracing::info!(?outcome, "Demo finished");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn test_demo_matches_service_scenario() {
        let config = DemoConfig {
            initial: "initial".into(),
            updates: vec!["new value".into(), "final".into()],
            delay_ms: 2000,
        };
        let shutdown = Shutdown::new();
        let outcome = LocalSet::new()
            .run_until(run(&config, shutdown.subscribe()))
            .await;

        assert!(outcome.completed);
        assert_eq!(outcome.early_view, vec!["initial", "new value", "final"]);
        assert_eq!(outcome.late_view, vec!["new value", "final"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_stops_on_shutdown() {
        let config = DemoConfig::default();
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        shutdown.trigger();

        let outcome = LocalSet::new().run_until(run(&config, rx)).await;
        assert!(!outcome.completed);
        assert_eq!(outcome.early_view, vec!["initial"]);
        assert!(outcome.late_view.is_empty());
    }
}
