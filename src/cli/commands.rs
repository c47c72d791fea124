use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::fea::{parse_batch_file, sync_files, LanguageSystemSync};
use crate::font::{load_codepoints, postscript_name, FontLocation};
use crate::models::{Config, ShapeOptions};
use crate::shaper::{HarfBuzzRenderer, ImageOutput};
use crate::utils::write_output;
use super::args::{parse_font_size, parse_unicodes, Command, ShapingArgs};

/// Execute a parsed command
pub fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Sync {
            fea,
            font,
            face_index,
            unicodes,
            output,
            ..
        } => {
            let fea_text = fs::read_to_string(&fea)?;
            let mut codepoints = match &font {
                Some(font) => load_codepoints(font, face_index)?,
                None => BTreeSet::new(),
            };
            if let Some(unicodes) = &unicodes {
                codepoints.extend(parse_unicodes(unicodes)?);
            }

            let updated = LanguageSystemSync::new().synchronize(&fea_text, codepoints);
            match output {
                Some(output) => {
                    if output.exists() && !config.overwrite {
                        return Err(Error::Config(format!(
                            "{} already exists, use --overwrite to replace it",
                            output.display()
                        )));
                    }
                    write_output(&output, &updated)?;
                    info!("Wrote {}", output.display());
                }
                None => println!("{}", updated),
            }
            Ok(())
        }
        Command::Batch { file, .. } => {
            let jobs = parse_batch_file(&file)?;
            let sync = LanguageSystemSync::new();
            let reports = sync_files(&jobs, &sync, config);

            let mut failed = 0;
            for report in &reports {
                match &report.result {
                    Ok(outcome) if outcome.changed => info!(
                        "Updated {} ({} languagesystem declarations)",
                        outcome.output.display(),
                        outcome.declarations
                    ),
                    Ok(outcome) => info!("Unchanged {}", outcome.output.display()),
                    Err(_) => failed += 1,
                }
            }
            println!(
                "Batch complete: {} processed, {} failed",
                reports.len() - failed,
                failed
            );
            if failed > 0 {
                return Err(Error::Batch(format!("{} of {} jobs failed", failed, reports.len())));
            }
            Ok(())
        }
        Command::Scripts { tags } => {
            let sync = LanguageSystemSync::new();
            let resolver = sync.resolver();
            if tags.is_empty() {
                for (iso, ot_tags) in resolver.iso_to_open_type_map() {
                    println!("{}\t{}", iso, join_tags(&ot_tags));
                }
            } else {
                for tag in &tags {
                    let iso = resolver.iso_script_of(tag);
                    let ot_tags = resolver.open_type_scripts_of(iso.as_str());
                    println!("{}\t{}\t{}", tag, iso, join_tags(&ot_tags));
                }
            }
            Ok(())
        }
        Command::Shape { text, shaping } => {
            let mut renderer = renderer_for(&shaping)?;
            let lines = renderer.to_json(Some(text.as_str()))?;
            for line in &lines {
                println!("{}", serde_json::to_string(line)?);
            }
            Ok(())
        }
        Command::Render {
            text,
            shaping,
            format,
            font_size,
            output,
        } => {
            let mut renderer = renderer_for(&shaping)?;
            let font_size = font_size.as_deref().map(parse_font_size).transpose()?;
            match renderer.to_image(Some(text.as_str()), format, font_size, output.as_deref())? {
                Some(ImageOutput::File(path)) => info!("Wrote {}", path.display()),
                Some(ImageOutput::Bytes(bytes)) => io::stdout().write_all(&bytes)?,
                None => warn!("Nothing rendered"),
            }
            Ok(())
        }
        Command::Shapers => {
            let mut renderer = HarfBuzzRenderer::default();
            renderer.update_shapers()?;
            for shaper in renderer.all_shapers() {
                println!("{}", shaper);
            }
            info!("Platform shaper: {}", renderer.shaper_os());
            Ok(())
        }
    }
}

fn join_tags(tags: &[crate::models::ScriptTag]) -> String {
    tags.iter()
        .map(|tag| format!("'{}'", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a renderer from an options file overlaid with command line flags
fn renderer_for(shaping: &ShapingArgs) -> Result<HarfBuzzRenderer> {
    let options = match &shaping.options {
        Some(path) => ShapeOptions::from_json_file(path)?,
        None => ShapeOptions::default(),
    };
    let mut renderer = HarfBuzzRenderer::new(options);

    if let Some(font) = &shaping.font {
        if !font.is_file() {
            return Err(Error::InvalidPath(font.clone()));
        }
        renderer.load_font(font.clone(), shaping.face_index);
    } else if let Some(family) = &shaping.family {
        let location = renderer.load_system_font(family)?;
        info!("Using {} for '{}'", location.path.display(), family);
    }
    let Some(font_file) = renderer.options.font_file.clone() else {
        return Err(Error::Config("a font is required, pass --font or --family".to_string()));
    };
    let location = FontLocation {
        path: font_file,
        face_index: renderer.options.face_index,
    };
    if let Some(name) = postscript_name(&location) {
        info!("Shaping with {}", name);
    }

    if !shaping.features.is_empty() {
        renderer.options.features = shaping.features.clone();
    }
    if let Some(direction) = shaping.direction {
        renderer.options.direction = direction;
    }
    if let Some(script) = &shaping.script {
        renderer.options.script = Some(script.clone());
    }
    if let Some(language) = &shaping.language {
        renderer.options.language = language.clone();
    }
    if shaping.glyph_indexes {
        renderer.options.use_glyph_indexes = true;
    }
    Ok(renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sync_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let fea = dir.path().join("features.fea");
        let output = dir.path().join("out/features.fea");
        fs::write(&fea, "languagesystem cyrl dflt;\nfeature smcp { sub a by a.sc; } smcp;\n").unwrap();

        let command = Command::Sync {
            fea,
            font: None,
            face_index: 0,
            unicodes: Some("U+010A,U+20AC,U+063C".to_string()),
            output: Some(output.clone()),
            overwrite: false,
        };
        run(command, &Config::default()).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "languagesystem DFLT dflt;\nlanguagesystem latn dflt;\nlanguagesystem arab dflt;\n\
             languagesystem cyrl dflt;\nfeature smcp { sub a by a.sc; } smcp;"
        );
    }

    #[test]
    fn sync_reports_missing_input() {
        let command = Command::Sync {
            fea: PathBuf::from("/nonexistent/features.fea"),
            font: None,
            face_index: 0,
            unicodes: None,
            output: None,
            overwrite: false,
        };
        assert!(matches!(run(command, &Config::default()), Err(Error::Io(_))));
    }

    #[test]
    fn renderer_needs_a_font() {
        assert!(matches!(renderer_for(&ShapingArgs::default()), Err(Error::Config(_))));

        let shaping = ShapingArgs {
            font: Some(PathBuf::from("/nonexistent/A.otf")),
            ..ShapingArgs::default()
        };
        assert!(matches!(renderer_for(&shaping), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn flags_override_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("A.otf");
        fs::write(&font, b"OTTO").unwrap();
        let options = dir.path().join("options.json");
        fs::write(&options, r#"{"features": ["+smcp"], "language": "pl", "direction": "ltr"}"#).unwrap();

        let shaping = ShapingArgs {
            font: Some(font.clone()),
            options: Some(options),
            features: vec!["-liga".to_string()],
            glyph_indexes: true,
            ..ShapingArgs::default()
        };
        let renderer = renderer_for(&shaping).unwrap();
        assert_eq!(renderer.options.font_file, Some(font));
        assert_eq!(renderer.options.features, vec!["-liga"]);
        assert_eq!(renderer.options.language, "pl");
        assert_eq!(renderer.options.direction, crate::models::Direction::Ltr);
        assert!(renderer.options.use_glyph_indexes);
    }
}
