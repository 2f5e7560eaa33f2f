use anyhow::Result;

use crate::context::App;

pub async fn run(app: &App) -> Result<()> {
    for category in app.categories().await? {
        println!("{category}");
    }
    Ok(())
}
