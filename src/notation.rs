//! # Notation Rendering
//!
//! Turns the current pitch into a one-measure MusicXML score and writes it
//! to a fixed file in the temp directory, overwriting the previous one.
//!
//! The score holds:
//! - a treble clef if the pitch (ignoring its accidental) is C4 or higher, else a bass clef
//! - a 4/4 time signature with `print-object="no"` so it is not engraved
//! - one whole note
//!
//! An optional engraver command can convert the MusicXML file into an image;
//! `{input}` and `{output}` in its arguments are replaced by the two paths.

use crate::error::TrainerError;
use crate::pitch::{Pitch, Step};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Base name of the files written into the temp directory
pub const FILE_STEM: &str = "interval_trainer_current_note";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    /// Treble from middle C up, bass below
    pub fn for_pitch(pitch: &Pitch) -> Clef {
        if pitch.without_accidental().sounding() >= Pitch::natural(Step::C, 4).sounding() {
            Clef::Treble
        } else {
            Clef::Bass
        }
    }

    fn sign_and_line(self) -> (&'static str, u8) {
        match self {
            Clef::Treble => ("G", 2),
            Clef::Bass => ("F", 4),
        }
    }
}

/// Something that can show a pitch as notation and tell us where it put it
pub trait NotationRenderer {
    fn render(&mut self, pitch: &Pitch) -> Result<PathBuf, TrainerError>;
}

/// Convert a single pitch to a MusicXML document
pub fn to_musicxml(pitch: &Pitch) -> String {
    let mut xml = String::new();

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');
    xml.push_str(r#"<score-partwise version="4.0">"#);
    xml.push('\n');

    xml.push_str("  <part-list>\n");
    xml.push_str("    <score-part id=\"P1\">\n");
    xml.push_str("      <part-name print-object=\"no\"></part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");

    xml.push_str("  <part id=\"P1\">\n");
    xml.push_str("    <measure number=\"1\">\n");
    xml.push_str(&attributes_to_xml(Clef::for_pitch(pitch)));
    xml.push_str(&note_to_xml(pitch));
    xml.push_str("    </measure>\n");
    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");

    xml
}

fn attributes_to_xml(clef: Clef) -> String {
    let (sign, line) = clef.sign_and_line();
    let mut xml = String::new();

    xml.push_str("      <attributes>\n");
    xml.push_str("        <divisions>4</divisions>\n"); // 4 divisions per quarter note
    xml.push_str("        <time print-object=\"no\">\n");
    xml.push_str("          <beats>4</beats>\n");
    xml.push_str("          <beat-type>4</beat-type>\n");
    xml.push_str("        </time>\n");
    xml.push_str("        <clef>\n");
    xml.push_str(&format!("          <sign>{}</sign>\n", sign));
    xml.push_str(&format!("          <line>{}</line>\n", line));
    xml.push_str("        </clef>\n");
    xml.push_str("      </attributes>\n");
    xml
}

fn note_to_xml(pitch: &Pitch) -> String {
    let mut xml = String::new();

    xml.push_str("      <note>\n");
    xml.push_str("        <pitch>\n");
    xml.push_str(&format!("          <step>{}</step>\n", pitch.step.as_str()));
    if pitch.alter != 0 {
        xml.push_str(&format!("          <alter>{}</alter>\n", pitch.alter));
    }
    xml.push_str(&format!("          <octave>{}</octave>\n", pitch.octave));
    xml.push_str("        </pitch>\n");
    xml.push_str("        <duration>16</duration>\n");
    xml.push_str("        <type>whole</type>\n");
    if let Some(accidental) = accidental_name(pitch.alter) {
        xml.push_str(&format!("        <accidental>{}</accidental>\n", accidental));
    }
    xml.push_str("      </note>\n");
    xml
}

/// MusicXML accidental names; the selector never accepts anything past doubles
fn accidental_name(alter: i8) -> Option<&'static str> {
    match alter {
        -2 => Some("flat-flat"),
        -1 => Some("flat"),
        1 => Some("sharp"),
        2 => Some("double-sharp"),
        _ => None,
    }
}

/// External program invocation with `{input}`/`{output}` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    /// Build from an argv list (program first)
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Run to completion, substituting the placeholders
    pub fn run(&self, input: &Path, output: Option<&Path>) -> Result<(), TrainerError> {
        let input = input.to_string_lossy();
        let output = output.map(|path| path.to_string_lossy().into_owned()).unwrap_or_default();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect();

        log::debug!("running {} {:?}", self.program, args);
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| TrainerError::External {
                program: self.program.clone(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(TrainerError::External {
                program: self.program.clone(),
                message: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

/// Writes MusicXML to `<dir>/interval_trainer_current_note.musicxml`
#[derive(Debug, Clone)]
pub struct MusicXmlRenderer {
    dir: PathBuf,
    engraver: Option<ExternalCommand>,
}

impl MusicXmlRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            engraver: None,
        }
    }

    /// Renderer writing into the system temp directory
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn with_engraver(mut self, engraver: Option<ExternalCommand>) -> Self {
        self.engraver = engraver;
        self
    }

    pub fn musicxml_path(&self) -> PathBuf {
        self.dir.join(format!("{}.musicxml", FILE_STEM))
    }

    pub fn image_path(&self) -> PathBuf {
        self.dir.join(format!("{}.png", FILE_STEM))
    }
}

impl NotationRenderer for MusicXmlRenderer {
    fn render(&mut self, pitch: &Pitch) -> Result<PathBuf, TrainerError> {
        let xml_path = self.musicxml_path();
        std::fs::write(&xml_path, to_musicxml(pitch))?;
        log::debug!("wrote notation for {} to {}", pitch, xml_path.display());

        match &self.engraver {
            Some(engraver) => {
                let image_path = self.image_path();
                engraver.run(&xml_path, Some(&image_path))?;
                Ok(image_path)
            }
            None => Ok(xml_path),
        }
    }
}
