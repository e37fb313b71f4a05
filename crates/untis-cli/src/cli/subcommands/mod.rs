mod resolve;

pub use resolve::{ResolveCommands, ResolveIdsArgs, ResolveNameArgs};
