//! `parley models`: print the model catalog.

use anyhow::Result;
use console::style;

use parley_core::models::catalog;

/// Print the models offered to clients, marking the configured default.
pub fn list_models(default_model: &str, json: bool) -> Result<()> {
    let catalog = catalog();

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Models ──").dim());
    for model in &catalog.models {
        if *model == default_model {
            println!("  {} {}", style(model).cyan().bold(), style("(default)").dim());
        } else {
            println!("  {model}");
        }
    }
    if !catalog.models.iter().any(|m| *m == default_model) {
        println!();
        println!(
            "  {} default model '{}' is not in the catalog",
            style("!").yellow().bold(),
            default_model
        );
    }
    println!();

    Ok(())
}
