use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::font::{resolve_system_font, FontLocation};
use crate::models::{FontSize, ImageFormat, ShapeOptions};
use super::args::{shape_args, view_args};
use super::output::{parse_glyph_records, ImageOutput, ShapedLine};

/// Pick the platform shaper from the shapers HarfBuzz was built with
pub fn select_os_shaper(all_shapers: &[String], target_os: &str) -> Option<&'static str> {
    let has = |name: &str| all_shapers.iter().any(|shaper| shaper == name);
    match target_os {
        "windows" if has("directwrite") && !has("uniscribe") => Some("directwrite"),
        "windows" if has("uniscribe") => Some("uniscribe"),
        "macos" if has("coretext") => Some("coretext"),
        _ => None,
    }
}

/// Facade over the `hb-shape` and `hb-view` command line utilities
#[derive(Debug, Clone)]
pub struct HarfBuzzRenderer {
    pub options: ShapeOptions,
    /// `hb-shape` executable
    pub hb_shape: PathBuf,
    /// `hb-view` executable
    pub hb_view: PathBuf,
    all_shapers: Vec<String>,
    shaper_os: String,
}

impl Default for HarfBuzzRenderer {
    fn default() -> Self {
        Self::new(ShapeOptions::default())
    }
}

impl HarfBuzzRenderer {
    pub fn new(options: ShapeOptions) -> Self {
        let shaper = options.shapers.first().cloned().unwrap_or_else(|| "ot".to_string());
        Self {
            options,
            hb_shape: PathBuf::from("hb-shape"),
            hb_view: PathBuf::from("hb-view"),
            all_shapers: vec![shaper.clone()],
            shaper_os: shaper,
        }
    }

    /// Shapers reported by the last [`update_shapers`](Self::update_shapers)
    pub fn all_shapers(&self) -> &[String] {
        &self.all_shapers
    }

    /// The platform shaper, or the default shaper when there is none
    pub fn shaper_os(&self) -> &str {
        &self.shaper_os
    }

    /// Ask `hb-shape` which shapers it supports and pick the platform one.
    /// Falls back to the platform shaper when `ot` is not available.
    pub fn update_shapers(&mut self) -> Result<()> {
        let args = vec!["--list-shapers".to_string()];
        let output = run_tool(&self.hb_shape, &args, b"")?
            .ok_or_else(|| not_installed(&self.hb_shape))?;
        let listing = String::from_utf8_lossy(&output);
        self.apply_shaper_list(listing.lines().map(str::to_string).collect(), std::env::consts::OS);
        Ok(())
    }

    fn apply_shaper_list(&mut self, all_shapers: Vec<String>, target_os: &str) {
        self.all_shapers = all_shapers;
        if let Some(shaper) = select_os_shaper(&self.all_shapers, target_os) {
            self.shaper_os = shaper.to_string();
        }
        if !self.all_shapers.iter().any(|shaper| shaper == "ot") {
            info!("'ot' shaper not available, using '{}'", self.shaper_os);
            self.options.shapers = vec![self.shaper_os.clone()];
        }
        debug!("Available shapers: {:?}", self.all_shapers);
    }

    pub fn load_font(&mut self, font_file: impl Into<PathBuf>, face_index: u32) {
        self.options.font_file = Some(font_file.into());
        self.options.face_index = face_index;
    }

    /// Use an installed font, looked up by family name
    pub fn load_system_font(&mut self, family: &str) -> Result<FontLocation> {
        let location = resolve_system_font(family)?;
        self.load_font(location.path.clone(), location.face_index);
        Ok(location)
    }

    /// Text to shape: `text` when given (and remembered), else the text
    /// file, else the stored text
    fn input_text(&mut self, text: Option<&str>) -> Result<String> {
        if let Some(text) = text {
            self.options.text = text.to_string();
            return Ok(self.options.text.clone());
        }
        match &self.options.text_file {
            Some(path) => Ok(fs::read_to_string(path)?),
            None => Ok(self.options.text.clone()),
        }
    }

    /// Shape text with `hb-shape` and return the glyph records per line
    pub fn to_json(&mut self, text: Option<&str>) -> Result<Vec<ShapedLine>> {
        self.options.validate()?;
        let text = self.input_text(text)?;
        let args = shape_args(&self.options);

        let output = run_tool(&self.hb_shape, &args, text.as_bytes())?
            .ok_or_else(|| not_installed(&self.hb_shape))?;
        parse_glyph_records(&String::from_utf8_lossy(&output))
    }

    /// Render text with `hb-view`.
    ///
    /// Returns the output path when `output_file` is set, the image data
    /// otherwise, and `None` when `hb-view` is not installed.
    pub fn to_image(
        &mut self,
        text: Option<&str>,
        format: ImageFormat,
        font_size: Option<FontSize>,
        output_file: Option<&Path>,
    ) -> Result<Option<ImageOutput>> {
        if let Some(font_size) = font_size {
            self.options.font_size = font_size;
        }
        self.options.validate()?;
        let text = self.input_text(text)?;
        let args = view_args(&self.options, format, output_file);

        let Some(output) = run_tool(&self.hb_view, &args, text.as_bytes())? else {
            warn!("{} is not installed, cannot render {}", self.hb_view.display(), format);
            return Ok(None);
        };

        Ok(Some(match output_file {
            Some(path) => ImageOutput::File(path.to_path_buf()),
            None => ImageOutput::Bytes(output),
        }))
    }

    pub fn to_svg(&mut self, text: Option<&str>, font_size: Option<FontSize>, output_file: Option<&Path>) -> Result<Option<ImageOutput>> {
        self.to_image(text, ImageFormat::Svg, font_size, output_file)
    }

    pub fn to_png(&mut self, text: Option<&str>, font_size: Option<FontSize>, output_file: Option<&Path>) -> Result<Option<ImageOutput>> {
        self.to_image(text, ImageFormat::Png, font_size, output_file)
    }

    pub fn to_pdf(&mut self, text: Option<&str>, font_size: Option<FontSize>, output_file: Option<&Path>) -> Result<Option<ImageOutput>> {
        self.to_image(text, ImageFormat::Pdf, font_size, output_file)
    }
}

fn not_installed(program: &Path) -> Error {
    Error::Tool {
        tool: program.display().to_string(),
        message: "executable not found, install HarfBuzz utilities".to_string(),
    }
}

/// Run `program` with `input` on stdin and return its stdout.
/// `Ok(None)` means the executable could not be found.
fn run_tool(program: &Path, args: &[String], input: &[u8]) -> Result<Option<Vec<u8>>> {
    debug!("Running {} {}", program.display(), args.join(" "));

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    // Feed stdin from a separate thread: the tool writes output while it
    // reads, and a full stdout pipe would otherwise block both sides
    let stdin = child.stdin.take();
    let output = thread::scope(|scope| -> Result<Output> {
        let writer = scope.spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                // A tool that exits early closes the pipe; its exit status says why
                if let Err(e) = stdin.write_all(input) {
                    if e.kind() != io::ErrorKind::BrokenPipe {
                        return Err(e);
                    }
                }
            }
            Ok(())
        });

        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(written) => written?,
            Err(panic) => std::panic::resume_unwind(panic),
        }
        Ok(output)
    })?;
    if !output.status.success() {
        return Err(Error::Tool {
            tool: program.display().to_string(),
            message: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(Some(output.stdout))
}
