use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::font::load_codepoints;
use crate::models::Config;
use crate::script::TagTable;
use crate::utils::write_output;
use super::langsys::LanguageSystemSync;

/// One FEA file to synchronize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncJob {
    pub input: PathBuf,
    /// Font whose cmap supplies the code points
    pub font: Option<PathBuf>,
    /// Where to write the result; the input is rewritten in place when unset
    pub output: Option<PathBuf>,
}

impl SyncJob {
    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

/// Result of one batch job
#[derive(Debug)]
pub struct SyncReport {
    pub job: SyncJob,
    pub result: Result<SyncOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub output: PathBuf,
    /// Number of `languagesystem` lines written
    pub declarations: usize,
    /// Whether the written text differs from the input
    pub changed: bool,
}

/// Parse one batch line: `input.fea [font.ttf] [-> output.fea]`.
/// Relative paths are taken relative to `base_dir`.
pub fn parse_batch_line(line: &str, base_dir: &Path) -> Result<SyncJob> {
    let (sources, output) = match line.split_once("->") {
        Some((sources, output)) => {
            let output = output.trim();
            if output.is_empty() || output.contains(char::is_whitespace) {
                return Err(Error::Batch(format!("Invalid output path in '{}'", line)));
            }
            (sources, Some(base_dir.join(output)))
        }
        None => (line, None),
    };

    let parts: Vec<&str> = sources.split_whitespace().collect();
    match parts.as_slice() {
        [input] => Ok(SyncJob {
            input: base_dir.join(input),
            font: None,
            output,
        }),
        [input, font] => Ok(SyncJob {
            input: base_dir.join(input),
            font: Some(base_dir.join(font)),
            output,
        }),
        _ => Err(Error::Batch(format!(
            "Expected 'input.fea [font] [-> output.fea]', got '{}'",
            line
        ))),
    }
}

/// Read the jobs listed in a batch file, skipping blank lines and `#` comments
pub fn parse_batch_file(batch_file: &Path) -> Result<Vec<SyncJob>> {
    let content = fs::read_to_string(batch_file)?;
    let base_dir = batch_file.parent().unwrap_or_else(|| Path::new(""));

    let mut jobs = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let job = parse_batch_line(line, base_dir)
            .map_err(|e| Error::Batch(format!("{}:{}: {}", batch_file.display(), number + 1, e)))?;
        jobs.push(job);
    }

    info!("Found {} FEA files to process in {}", jobs.len(), batch_file.display());
    Ok(jobs)
}

/// Synchronize a single FEA file and write the result
pub fn run_job<T: TagTable>(job: &SyncJob, sync: &LanguageSystemSync<T>, config: &Config) -> Result<SyncOutcome> {
    if !job.input.is_file() {
        return Err(Error::InvalidPath(job.input.clone()));
    }
    let fea_text = fs::read_to_string(&job.input)?;

    let codepoints = match &job.font {
        Some(font) => load_codepoints(font, 0)?,
        None => BTreeSet::new(),
    };
    debug!("{}: {} code points", job.input.display(), codepoints.len());

    let updated = sync.synchronize(&fea_text, codepoints);
    let output = job.output_path();
    if output != job.input && output.exists() && !config.overwrite {
        return Err(Error::Config(format!(
            "{} already exists, use --overwrite to replace it",
            output.display()
        )));
    }
    write_output(output, &updated)?;

    Ok(SyncOutcome {
        output: output.to_path_buf(),
        declarations: updated.lines().take_while(|line| line.starts_with("languagesystem ")).count(),
        changed: updated != fea_text,
    })
}

/// Output paths written by more than one job
fn shared_outputs(jobs: &[SyncJob]) -> BTreeSet<&Path> {
    let mut seen = BTreeSet::new();
    let mut shared = BTreeSet::new();
    for job in jobs {
        if !seen.insert(job.output_path()) {
            shared.insert(job.output_path());
        }
    }
    shared
}

/// Run all jobs in parallel; a failing job does not stop the others.
/// Jobs that share an output path are all rejected without running.
/// Reports come back in job order.
pub fn sync_files<T>(jobs: &[SyncJob], sync: &LanguageSystemSync<T>, config: &Config) -> Vec<SyncReport>
where
    T: TagTable + Sync,
{
    let shared = shared_outputs(jobs);
    jobs.par_iter()
        .map(|job| {
            let result = if shared.contains(job.output_path()) {
                Err(Error::Batch(format!(
                    "{} is the output of more than one job",
                    job.output_path().display()
                )))
            } else {
                run_job(job, sync, config)
            };
            if let Err(e) = &result {
                warn!("Skipping {}: {}", job.input.display(), e);
            }
            SyncReport {
                job: job.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_batch_lines() {
        let base = Path::new("/work");
        assert_eq!(
            parse_batch_line("a.fea", base).unwrap(),
            SyncJob {
                input: PathBuf::from("/work/a.fea"),
                font: None,
                output: None,
            }
        );
        assert_eq!(
            parse_batch_line("a.fea fonts/A.otf -> out/a.fea", base).unwrap(),
            SyncJob {
                input: PathBuf::from("/work/a.fea"),
                font: Some(PathBuf::from("/work/fonts/A.otf")),
                output: Some(PathBuf::from("/work/out/a.fea")),
            }
        );
        assert_eq!(
            parse_batch_line("/abs/a.fea->b.fea", base).unwrap().output_path(),
            Path::new("/work/b.fea")
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        let base = Path::new("/work");
        assert!(matches!(parse_batch_line("a.fea b.otf c.otf", base), Err(Error::Batch(_))));
        assert!(matches!(parse_batch_line("a.fea ->", base), Err(Error::Batch(_))));
        assert!(matches!(parse_batch_line("-> out.fea", base), Err(Error::Batch(_))));
    }

    #[test]
    fn batch_file_skips_comments_and_reports_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("jobs.txt");
        fs::write(&batch, "# fea files\n\none.fea\n  two.fea -> two.out.fea\n").unwrap();
        let jobs = parse_batch_file(&batch).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].input, dir.path().join("one.fea"));
        assert_eq!(jobs[1].output_path(), dir.path().join("two.out.fea"));

        fs::write(&batch, "one.fea\na b c\n").unwrap();
        let err = parse_batch_file(&batch).unwrap_err();
        assert!(err.to_string().contains("jobs.txt:2"));
    }

    #[test]
    fn failing_jobs_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.fea");
        fs::write(&good, "languagesystem grek dflt;\nfeature kern {} kern;\n").unwrap();

        let jobs = vec![
            SyncJob {
                input: dir.path().join("missing.fea"),
                font: None,
                output: None,
            },
            SyncJob {
                input: good.clone(),
                font: None,
                output: None,
            },
        ];
        let sync = LanguageSystemSync::new();
        let reports = sync_files(&jobs, &sync, &Config::default());

        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].result, Err(Error::InvalidPath(_))));
        let outcome = reports[1].result.as_ref().unwrap();
        assert_eq!(outcome.declarations, 3);
        assert!(outcome.changed);
        assert_eq!(
            fs::read_to_string(&good).unwrap(),
            "languagesystem DFLT dflt;\nlanguagesystem latn dflt;\nlanguagesystem grek dflt;\nfeature kern {} kern;"
        );
    }

    #[test]
    fn jobs_sharing_an_output_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.fea", "b.fea", "c.fea"] {
            fs::write(dir.path().join(name), "feature kern {} kern;").unwrap();
        }
        let job = |input: &str, output: Option<&str>| SyncJob {
            input: dir.path().join(input),
            font: None,
            output: output.map(|output| dir.path().join(output)),
        };
        // 'b.fea' is rewritten in place and is also the output of 'c.fea'
        let jobs = vec![
            job("a.fea", Some("out.fea")),
            job("b.fea", None),
            job("c.fea", Some("b.fea")),
            job("a.fea", Some("out.fea")),
        ];
        let sync = LanguageSystemSync::new();
        let config = Config {
            overwrite: true,
            ..Config::default()
        };
        let reports = sync_files(&jobs, &sync, &config);

        assert!(reports.iter().all(|report| matches!(report.result, Err(Error::Batch(_)))));
        assert!(!dir.path().join("out.fea").exists());
        assert_eq!(fs::read_to_string(dir.path().join("b.fea")).unwrap(), "feature kern {} kern;");

        let reports = sync_files(&[job("c.fea", None)], &sync, &config);
        assert!(reports[0].result.is_ok());
    }

    #[test]
    fn refuses_to_replace_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.fea");
        let output = dir.path().join("out.fea");
        fs::write(&input, "").unwrap();
        fs::write(&output, "keep me").unwrap();
        let job = SyncJob {
            input,
            font: None,
            output: Some(output.clone()),
        };
        let sync = LanguageSystemSync::new();

        assert!(matches!(run_job(&job, &sync, &Config::default()), Err(Error::Config(_))));
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

        let config = Config {
            overwrite: true,
            ..Config::default()
        };
        assert!(run_job(&job, &sync, &config).is_ok());
    }
}
