use crate::prelude::{eprintln, println, *};
use devgenius_core::feature::{all, FeatureDescriptor};

#[derive(Debug, clap::Args)]
pub struct App {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let features = all();

    if global.verbose {
        eprintln!("{} features available", features.len());
    }

    if app.json {
        println!("{}", format_features_json(features)?);
    } else {
        let mut table = new_table();
        table.set_titles(prettytable::row!["ID", "Name", "Description", "Submit"]);
        for feature in features {
            table.add_row(prettytable::row![
                feature.id,
                feature.name,
                feature.description,
                feature.submit_label
            ]);
        }
        table.printstd();
    }

    Ok(())
}

fn format_features_json(features: &[FeatureDescriptor]) -> Result<String> {
    Ok(serde_json::to_string_pretty(features)?)
}
