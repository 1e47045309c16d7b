use super::{current_dir, workspace_root};
use crate::{GlobalOptions, SnippetsArgs};
use anyhow::Result;
use chunkflow_protocol::{serialize_json_pretty, SnippetCollection};
use chunkflow_snippets::{filter_by_scope, WorkspaceSession};

pub(crate) async fn run_snippets(args: SnippetsArgs, options: &GlobalOptions) -> Result<()> {
    let root = workspace_root(options, &current_dir(), &options.session.workspace).await;
    let session = WorkspaceSession::open(root, options.session.clone()).await;

    let mut found = session.find_for_package(args.package.as_deref()).await;
    if let Some(language) = args.language.as_deref() {
        found = found
            .map(|collection| SnippetCollection::new(filter_by_scope(collection.snippets, language)))
            .filter(|collection| !collection.is_empty());
        log::debug!(
            "{} snippets apply to '{language}'",
            found.as_ref().map_or(0, SnippetCollection::len)
        );
    }

    println!("{}", serialize_json_pretty(&found)?);
    Ok(())
}
