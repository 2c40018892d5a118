use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use connectsphere_core::query::tags_in_use;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct TagsArgs {}

#[derive(Debug, Serialize)]
struct TagUsageDto {
    tag: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct TagsDto<'a> {
    palette: &'a [String],
    in_use: Vec<TagUsageDto>,
}

pub fn list_tags(ctx: &Context<'_>, _args: TagsArgs) -> Result<()> {
    let snapshot = ctx.store.contacts().list_all()?;
    let in_use: Vec<TagUsageDto> = tags_in_use(&snapshot)
        .into_iter()
        .map(|(tag, count)| TagUsageDto { tag, count })
        .collect();

    if ctx.json {
        return print_json(&TagsDto {
            palette: &ctx.config.tag_palette,
            in_use,
        });
    }

    println!("palette: {}", ctx.config.tag_palette.join(", "));
    for usage in in_use {
        println!("{} {}", usage.tag, usage.count);
    }
    Ok(())
}
