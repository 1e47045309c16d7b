use super::{current_dir, workspace_root};
use crate::{GlobalOptions, PackagesArgs};
use anyhow::Result;
use chunkflow_protocol::serialize_json_pretty;
use chunkflow_workspace::{PackageDescriptor, WorkspaceResolver};

pub(crate) async fn run_packages(args: PackagesArgs, options: &GlobalOptions) -> Result<()> {
    let config = &options.session.workspace;
    let root = workspace_root(options, &current_dir(), config).await;
    let store = WorkspaceResolver::new(config.clone()).resolve(&root).await;

    let packages: Vec<&PackageDescriptor> = match args.dependents_of.as_deref() {
        Some(name) => store.dependents_of(name),
        None => store.iter().collect(),
    };
    println!("{}", serialize_json_pretty(&packages)?);
    Ok(())
}
