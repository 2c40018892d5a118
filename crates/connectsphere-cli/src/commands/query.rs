use crate::commands::contacts::{PagingArgs, ViewArgs};
use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use connectsphere_core::to_remote_query;

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub view: ViewArgs,
    #[command(flatten)]
    pub paging: PagingArgs,
}

/// Prints the remote descriptor for a view without executing it.
pub fn print_query(ctx: &Context<'_>, args: QueryArgs) -> Result<()> {
    let params = args.view.resolve(ctx.config)?;
    let paging = args.paging.resolve(ctx.config)?;
    print_json(&to_remote_query(&params, paging))
}
