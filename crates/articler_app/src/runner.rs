use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use articler_core::{JobRequest, JobSnapshot};
use articler_engine::{
    EngineConfig, EngineHandle, OpenRouterClient, RandomVariation, MAX_CONCURRENCY_LIMIT,
};
use engine_logging::{engine_info, engine_warn};

use crate::cli::Cli;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = EngineConfig::from_env().context("reading engine configuration")?;
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = checked_concurrency(concurrency)?;
    }
    if config.completion.api_key.is_none() {
        engine_warn!("OPENROUTER_API_KEY is not set; every article will carry a failure notice");
    }
    engine_info!("Engine config {:?}", config);

    let request = load_request(&cli.request)?;
    let completion = OpenRouterClient::new(config.completion.clone())
        .context("building completion client")?;
    let engine = EngineHandle::start(&config, Arc::new(completion), Arc::new(RandomVariation));

    let job_id = engine.submit(request)?;
    let snapshot = engine
        .wait_for(&job_id, Duration::from_millis(cli.poll_ms.max(1)), |s| {
            engine_info!(
                "Job {} progress {:.0}% ({}/{})",
                job_id,
                s.progress * 100.0,
                s.articles.len(),
                s.total
            );
        })
        .await?;
    engine.shutdown().await;

    write_snapshot(&snapshot, cli.output.as_deref())?;
    if let Some(error) = snapshot.error {
        bail!("job {job_id} failed: {error}");
    }
    Ok(())
}

fn checked_concurrency(concurrency: usize) -> anyhow::Result<usize> {
    if concurrency == 0 {
        bail!("--concurrency must be at least 1");
    }
    if concurrency > MAX_CONCURRENCY_LIMIT {
        bail!("--concurrency must be at most {MAX_CONCURRENCY_LIMIT}");
    }
    Ok(concurrency)
}

pub fn load_request(path: &Path) -> anyhow::Result<JobRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading request file {}", path.display()))?;
    let request: JobRequest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing request file {}", path.display()))?;
    Ok(request.normalized())
}

pub fn write_snapshot(snapshot: &JobSnapshot, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.flush()?;
            engine_info!("Wrote {} article(s) to {}", snapshot.articles.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, snapshot)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn request_file_is_loaded_and_normalized() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("request.json");
        fs::write(
            &path,
            r#"{
                "main_keyword": " main ",
                "main_link": "https://main.example",
                "secondary_keywords": ["a", "  ", " b "],
                "title_pool": ["T1", ""]
            }"#,
        )
        .unwrap();

        let request = load_request(&path).unwrap();
        assert_eq!(request.main_keyword, "main");
        assert_eq!(request.secondary_keywords, vec!["a", "b"]);
        assert_eq!(request.title_pool, vec!["T1"]);
        assert!(request.link_pool.is_empty());
    }

    #[test]
    fn concurrency_override_is_bounded() {
        assert_eq!(checked_concurrency(8).unwrap(), 8);
        assert_eq!(
            checked_concurrency(MAX_CONCURRENCY_LIMIT).unwrap(),
            MAX_CONCURRENCY_LIMIT
        );
        assert!(checked_concurrency(0).is_err());
        let err = checked_concurrency(MAX_CONCURRENCY_LIMIT + 1).unwrap_err();
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn invalid_request_file_names_the_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_request(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn snapshot_is_written_as_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");
        let snapshot = JobSnapshot {
            total: 0,
            articles: Vec::new(),
            done: true,
            error: None,
            progress: 1.0,
            main_keyword: "main".to_string(),
            main_link: "https://main.example".to_string(),
        };

        write_snapshot(&snapshot, Some(&path)).unwrap();
        let written: JobSnapshot =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, snapshot);
    }
}
