//! The `tagprune relations` command for inspecting the relationship dataset.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use tagprune_core::{Config, RelationTable};

/// Arguments for the `relations` command.
#[derive(Args, Debug)]
pub struct RelationsArgs {
    /// Relations dataset to inspect (overrides config; defaults to the bundled dataset)
    #[arg(long, global = true)]
    pub relations: Option<PathBuf>,

    #[command(subcommand)]
    pub command: RelationsCommand,
}

/// Subcommands for dataset inspection.
#[derive(Subcommand, Debug)]
pub enum RelationsCommand {
    /// Show which tags a tag makes redundant
    Show {
        /// Tag identifier, matched exactly
        tag: String,
    },

    /// Show edge and tag counts
    Stats,
}

/// Execute the relations command.
pub fn execute(args: RelationsArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(path) = args.relations {
        config.relations.path = Some(path.to_string_lossy().into_owned());
    }
    let table = config.relation_table()?;

    match args.command {
        RelationsCommand::Show { tag } => print!("{}", describe_tag(&table, &tag)),
        RelationsCommand::Stats => {
            println!("Edges: {}", table.len());
            println!("Tags:  {}", table.tag_count());
        }
    }

    Ok(())
}

/// Render direct and transitive implications of `tag`.
fn describe_tag(table: &RelationTable, tag: &str) -> String {
    let direct = table.direct_implications(tag);
    if direct.is_empty() {
        return format!("{tag}: no known implications\n");
    }

    let mut transitive: Vec<String> = table.implied_by(tag).iter().cloned().collect();
    transitive.sort();

    format!(
        "{tag}\n  direct:     {}\n  transitive: {}\n",
        direct.join(", "),
        transitive.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_tag_lists_chain() {
        let table = RelationTable::from_edges([
            ("absurdly_long_hair", "very_long_hair"),
            ("very_long_hair", "long_hair"),
        ]);
        let text = describe_tag(&table, "absurdly_long_hair");
        assert!(text.contains("direct:     very_long_hair\n"));
        assert!(text.contains("transitive: long_hair, very_long_hair\n"));
    }

    #[test]
    fn describe_tag_unknown() {
        let table = RelationTable::default();
        assert_eq!(describe_tag(&table, "solo"), "solo: no known implications\n");
    }
}
