use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap(),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Prompt for a required line of text.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new().with_prompt(format!("  {label}")).interact_text()?)
}

/// Prompt for an optional line of text; empty input gives an empty string.
pub fn prompt_optional(label: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(format!("  {label} (skip)"))
        .default(String::new())
        .show_default(false)
        .interact_text()?)
}

/// Prompt for a hidden password.
pub fn prompt_password(label: &str) -> anyhow::Result<String> {
    Ok(rpassword::prompt_password(format!("  {label}: "))?)
}

pub fn print_error(message: &str) {
    eprintln!("  {}", message.red());
}
