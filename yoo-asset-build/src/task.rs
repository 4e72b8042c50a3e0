//! Build tasks and the pipeline that runs them

use crate::context::BuildContext;
use std::time::Instant;
use tracing::{error, info};
use yoo_asset_core::Result;

/// One step of a build pipeline
pub trait BuildTask: Send + Sync {
    /// Display name used in logs and errors
    fn name(&self) -> &str;

    fn run(&self, context: &mut BuildContext) -> Result<()>;
}

/// Runs tasks in order, stopping at the first failure
#[derive(Default)]
pub struct BuildPipeline {
    tasks: Vec<Box<dyn BuildTask>>,
}

impl BuildPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task<T: BuildTask + 'static>(mut self, task: T) -> Self {
        self.tasks.push(Box::new(task));
        self
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.name()).collect()
    }

    pub fn run(&self, context: &mut BuildContext) -> Result<()> {
        let pipeline_start = Instant::now();

        for task in &self.tasks {
            let task_start = Instant::now();
            info!("Running build task: {}", task.name());

            if let Err(e) = task.run(context) {
                error!("Build task '{}' failed: {}", task.name(), e);
                return Err(e);
            }

            info!(
                "Build task '{}' finished in {:?}",
                task.name(),
                task_start.elapsed()
            );
        }

        info!(
            "Build pipeline finished {} tasks in {:?}",
            self.tasks.len(),
            pipeline_start.elapsed()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use yoo_asset_core::YooAssetError;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl BuildTask for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&self, _context: &mut BuildContext) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                Err(YooAssetError::invalid_parameter(self.name, "boom"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_stops_at_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let recorder = |name, fail| Recorder {
            name,
            log: log.clone(),
            fail,
        };
        let pipeline = BuildPipeline::new()
            .with_task(recorder("a", false))
            .with_task(recorder("b", true))
            .with_task(recorder("c", false));

        let result = pipeline.run(&mut BuildContext::new());
        assert!(result.is_err());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
        assert_eq!(pipeline.task_names(), vec!["a", "b", "c"]);
    }
}
