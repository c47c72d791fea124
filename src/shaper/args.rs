use std::path::Path;

use crate::models::{Direction, ImageFormat, ShapeOptions};

/// Options shared by `hb-shape` and `hb-view`
pub fn common_args(options: &ShapeOptions) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(font_file) = &options.font_file {
        args.push(format!("--font-file={}", font_file.display()));
    }
    args.push(format!("--face-index={}", options.face_index));
    args.push(format!("--font-size={}", options.font_size));

    if !options.language.is_empty() {
        args.push(format!("--language={}", options.language));
    }
    if options.direction != Direction::Auto {
        args.push(format!("--direction={}", options.direction));
    }
    if let Some(script) = &options.script {
        args.push(format!("--script={}", script));
    }
    if !options.features.is_empty() {
        args.push(format!("--features={}", options.features.join(",")));
    }

    if options.bot {
        args.push("--bot".to_string());
    }
    if options.eot {
        args.push("--eot".to_string());
    }
    if !options.text_before.is_empty() {
        args.push(format!("--text-before={}", options.text_before));
    }
    if !options.text_after.is_empty() {
        args.push(format!("--text-after={}", options.text_after));
    }
    if options.preserve_default_ignorables {
        args.push("--preserve-default-ignorables".to_string());
    }
    if options.utf8_clusters {
        args.push("--utf8-clusters".to_string());
    }
    if options.cluster_level != 0 {
        args.push(format!("--cluster-level={}", options.cluster_level));
    }
    if options.normalize_glyphs {
        args.push("--normalize-glyphs".to_string());
    }
    if options.num_iterations != 1 {
        args.push(format!("--num-iterations={}", options.num_iterations));
    }
    if options.use_glyph_indexes {
        args.push("--no-glyph-names".to_string());
    }
    args.push(format!("--shapers={}", options.shapers.join(",")));

    args
}

/// Arguments for `hb-shape` printing JSON glyph records
pub fn shape_args(options: &ShapeOptions) -> Vec<String> {
    let mut args = vec!["--output-format=json".to_string()];
    args.extend(common_args(options));
    args
}

/// Arguments for `hb-view`; without `output_file` the image goes to stdout
pub fn view_args(options: &ShapeOptions, format: ImageFormat, output_file: Option<&Path>) -> Vec<String> {
    let mut args = vec![format!("--output-format={}", format)];
    if let Some(output_file) = output_file {
        args.push(format!("--output-file={}", output_file.display()));
    }
    args.extend(common_args(options));

    if options.annotate {
        args.push("--annotate".to_string());
    }
    args.push(format!("--background={}", options.background));
    args.push(format!("--foreground={}", options.foreground));
    if options.line_space != 0 {
        args.push(format!("--line-space={}", options.line_space));
    }
    args.push(format!("--margin={}", options.margin));
    args
}
