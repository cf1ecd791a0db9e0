pub mod factory;
pub mod level_by_level;
pub mod scheduler;

pub use factory::SchedulerFactory;
pub use level_by_level::LevelScheduler;
pub use scheduler::{Scheduler, SequentialScheduler};
