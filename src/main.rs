use std::path::PathBuf;

use anyhow::{Context, bail};
use shotmark::capture::FileCapture;
use shotmark::{EditorConfig, EditorMsg, EditorSession, Viewport};

const USAGE: &str = "usage: shotmark <image> <script.json> <output.png>";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let (Some(image), Some(script), Some(output), None) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        bail!(USAGE);
    };

    let config = EditorConfig::load();
    let script = tokio::fs::read_to_string(&script)
        .await
        .with_context(|| format!("failed to read {}", script.display()))?;
    let msgs: Vec<EditorMsg> =
        serde_json::from_str(&script).context("failed to parse editor script")?;

    let provider = FileCapture::new(image);
    let mut session = EditorSession::capture(&provider, Viewport::unbounded(), &config).await?;
    for msg in msgs {
        session.update(msg);
    }

    let result = session.complete().map_err(|(_, err)| err)?;
    result.save(&output)?;
    Ok(())
}
