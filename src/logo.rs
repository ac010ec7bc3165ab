// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Logo asset discovery and compliance checks.
//!
//! PNG dimensions come straight from the IHDR chunk, so only the first 24
//! bytes of an image are ever read. SVG files are accepted on format and
//! size alone.

use std::{
    collections::HashSet,
    fmt,
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    config::LogoConfig,
    error::{self, Error},
};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A,];
const PNG_HEADER_LEN: usize = 24;

/// Compliance thresholds applied to every asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(default)]
pub struct LogoRules
{
    /// Largest accepted file size in bytes.
    pub max_file_size:         u64,
    /// Smallest accepted width and height in pixels.
    pub min_dimension:         u32,
    /// Width and height below which a warning is emitted.
    pub recommended_dimension: u32,
}

impl Default for LogoRules
{
    fn default() -> Self
    {
        Self {
            max_file_size:         500 * 1024,
            min_dimension:         64,
            recommended_dimension: 200,
        }
    }
}

/// Image formats accepted as logos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "lowercase")]
pub enum LogoFormat
{
    /// Raster PNG image.
    Png,
    /// Vector SVG image.
    Svg,
}

impl LogoFormat
{
    /// Detects the format from the file extension, ignoring case.
    pub fn from_path(path: &Path,) -> Option<Self,>
    {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("png",) {
            Some(Self::Png,)
        } else if extension.eq_ignore_ascii_case("svg",) {
            Some(Self::Svg,)
        } else {
            None
        }
    }
}

/// Facts gathered about an accepted logo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct LogoAsset
{
    /// Location of the file.
    pub path:      PathBuf,
    /// Detected format.
    pub format:    LogoFormat,
    /// File size in bytes.
    pub byte_size: u64,
    /// Pixel width; absent for SVG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width:     Option<u32,>,
    /// Pixel height; absent for SVG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height:    Option<u32,>,
}

/// Non-fatal findings on an accepted logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum LogoWarning
{
    /// Width and height differ.
    NonSquare
    {
        /// Pixel width.
        width:  u32,
        /// Pixel height.
        height: u32,
    },
    /// Width or height is below the recommended size.
    BelowRecommended
    {
        /// Pixel width.
        width:       u32,
        /// Pixel height.
        height:      u32,
        /// Recommended minimum.
        recommended: u32,
    },
}

impl fmt::Display for LogoWarning
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        match self {
            Self::NonSquare {
                width,
                height,
            } => write!(f, "image is not square ({width}x{height})"),
            Self::BelowRecommended {
                width,
                height,
                recommended,
            } => write!(
                f,
                "image is smaller than the recommended {recommended}x{recommended} ({width}x{height})"
            ),
        }
    }
}

/// Reasons a logo is refused.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum LogoRejection
{
    /// Extension is neither `png` nor `svg`.
    UnsupportedFormat
    {
        /// Offending extension, when the file has one.
        extension: Option<String,>,
    },
    /// File exceeds the size limit.
    FileTooLarge
    {
        /// Actual size in bytes.
        size:  u64,
        /// Configured limit in bytes.
        limit: u64,
    },
    /// Width or height is below the minimum.
    TooSmall
    {
        /// Pixel width.
        width:   u32,
        /// Pixel height.
        height:  u32,
        /// Configured minimum.
        minimum: u32,
    },
    /// The file or its header could not be read.
    Unreadable
    {
        /// What went wrong.
        reason: String,
    },
}

impl LogoRejection
{
    /// Stable identifier used in reports.
    pub fn kind(&self,) -> &'static str
    {
        match self {
            Self::UnsupportedFormat {
                ..
            } => "unsupported_format",
            Self::FileTooLarge {
                ..
            } => "file_too_large",
            Self::TooSmall {
                ..
            } => "too_small",
            Self::Unreadable {
                ..
            } => "unreadable",
        }
    }
}

impl fmt::Display for LogoRejection
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        match self {
            Self::UnsupportedFormat {
                extension: Some(extension,),
            } => write!(f, "unsupported format .{extension} (expected png or svg)"),
            Self::UnsupportedFormat {
                extension: None,
            } => f.write_str("missing file extension (expected png or svg)",),
            Self::FileTooLarge {
                size,
                limit,
            } => write!(f, "file is too large ({:.1} KB, limit {} KB)", *size as f64 / 1024.0, limit / 1024),
            Self::TooSmall {
                width,
                height,
                minimum,
            } => write!(f, "image is too small ({width}x{height}, minimum {minimum}x{minimum})"),
            Self::Unreadable {
                reason,
            } => write!(f, "unreadable image: {reason}"),
        }
    }
}

/// A logo that passed every rule, with any warnings raised on the way.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct AcceptedLogo
{
    /// Facts about the file.
    pub asset:    LogoAsset,
    /// Non-fatal findings.
    pub warnings: Vec<LogoWarning,>,
}

/// Checks a single logo against `rules`.
///
/// # Errors
///
/// Returns the first [`LogoRejection`] in rule order: format, size, header,
/// dimensions.
pub fn validate(path: &Path, rules: &LogoRules,) -> Result<AcceptedLogo, LogoRejection,>
{
    let Some(format,) = LogoFormat::from_path(path,) else {
        return Err(LogoRejection::UnsupportedFormat {
            extension: path.extension().map(|extension| extension.to_string_lossy().into_owned(),),
        },);
    };

    let byte_size = fs::metadata(path,)
        .map_err(|source| LogoRejection::Unreadable {
            reason: source.to_string(),
        },)?
        .len();
    if byte_size > rules.max_file_size {
        return Err(LogoRejection::FileTooLarge {
            size:  byte_size,
            limit: rules.max_file_size,
        },);
    }

    let mut asset = LogoAsset {
        path: path.to_path_buf(),
        format,
        byte_size,
        width: None,
        height: None,
    };
    if format == LogoFormat::Svg {
        return Ok(AcceptedLogo {
            asset,
            warnings: Vec::new(),
        },);
    }

    let (width, height,) = read_png_dimensions(path,)?;
    asset.width = Some(width,);
    asset.height = Some(height,);

    if width < rules.min_dimension || height < rules.min_dimension {
        return Err(LogoRejection::TooSmall {
            width,
            height,
            minimum: rules.min_dimension,
        },);
    }

    let mut warnings = Vec::new();
    if width != height {
        warnings.push(LogoWarning::NonSquare {
            width,
            height,
        },);
    }
    if width < rules.recommended_dimension || height < rules.recommended_dimension {
        warnings.push(LogoWarning::BelowRecommended {
            width,
            height,
            recommended: rules.recommended_dimension,
        },);
    }

    Ok(AcceptedLogo {
        asset,
        warnings,
    },)
}

/// Extracts width and height from a PNG header.
///
/// Returns `None` unless `bytes` starts with the PNG signature followed by an
/// IHDR chunk.
pub fn png_dimensions(bytes: &[u8],) -> Option<(u32, u32,),>
{
    if bytes.len() < PNG_HEADER_LEN || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }

    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?,);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?,);
    Some((width, height,),)
}

fn read_png_dimensions(path: &Path,) -> Result<(u32, u32,), LogoRejection,>
{
    let mut header = [0_u8; PNG_HEADER_LEN];
    File::open(path,)
        .and_then(|mut file| file.read_exact(&mut header,),)
        .map_err(|source| LogoRejection::Unreadable {
            reason: source.to_string(),
        },)?;

    png_dimensions(&header,).ok_or_else(|| LogoRejection::Unreadable {
        reason: "missing PNG signature or IHDR chunk".to_owned(),
    },)
}

/// Collects the assets to validate.
///
/// Explicit files come first (missing ones are skipped), followed by a sorted
/// recursive walk of every root. Walked files must match one of
/// `file_names`, or have a logo extension when that list is empty. Paths are
/// returned once each, in discovery order.
///
/// # Errors
///
/// Returns [`Error::Io`] when a directory cannot be listed.
pub fn discover_assets(config: &LogoConfig,) -> Result<Vec<PathBuf,>, Error,>
{
    let mut seen = HashSet::new();
    let mut assets = Vec::new();

    for file in &config.files {
        if file.is_file() {
            if seen.insert(file.clone(),) {
                assets.push(file.clone(),);
            }
        } else {
            debug!("Skipping missing logo file {}", file.display());
        }
    }

    for root in &config.roots {
        if !root.is_dir() {
            debug!("Skipping missing asset root {}", root.display());
            continue;
        }

        let mut walked = Vec::new();
        walk(root, &mut walked,)?;
        for path in walked {
            if matches_file_names(&path, &config.file_names,) && seen.insert(path.clone(),) {
                assets.push(path,);
            }
        }
    }

    info!("Discovered {} logo asset(s)", assets.len());
    Ok(assets,)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf,>,) -> Result<(), Error,>
{
    let mut entries = fs::read_dir(dir,)
        .map_err(|source| error::io_error(dir, source,),)?
        .map(|entry| entry.map(|entry| entry.path(),),)
        .collect::<Result<Vec<_,>, _,>>()
        .map_err(|source| error::io_error(dir, source,),)?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, out,)?;
        } else if path.is_file() {
            out.push(path,);
        }
    }

    Ok((),)
}

fn matches_file_names(path: &Path, file_names: &[String],) -> bool
{
    if file_names.is_empty() {
        return LogoFormat::from_path(path,).is_some();
    }

    path.file_name()
        .and_then(|name| name.to_str(),)
        .is_some_and(|name| file_names.iter().any(|wanted| wanted == name,),)
}

/// Non-fatal finding attached to a path in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct ReportWarning
{
    /// Asset location.
    pub path:    PathBuf,
    /// Human readable finding.
    pub message: String,
}

/// Rejected asset in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct ReportError
{
    /// Asset location.
    pub path:   PathBuf,
    /// Stable rejection identifier.
    pub kind:   &'static str,
    /// Human readable reason.
    pub reason: String,
}

/// Aggregated outcome of a logo batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize,)]
pub struct ValidationReport
{
    /// Paths of accepted assets.
    pub valid:    Vec<PathBuf,>,
    /// Warnings raised on accepted assets.
    pub warnings: Vec<ReportWarning,>,
    /// Rejected assets.
    pub errors:   Vec<ReportError,>,
    /// Facts gathered about accepted assets.
    pub assets:   Vec<LogoAsset,>,
}

impl ValidationReport
{
    /// Returns `true` when no asset was rejected.
    pub fn passed(&self,) -> bool
    {
        self.errors.is_empty()
    }
}

/// Validates every asset in parallel and aggregates the results in input
/// order.
///
/// Every asset is evaluated; the batch never stops at the first rejection.
pub fn validate_assets(paths: &[PathBuf], rules: &LogoRules,) -> ValidationReport
{
    let progress = ProgressBar::new(paths.len() as u64,);
    if let Ok(style,) =
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {bar:30} {pos}/{len} {msg}",)
    {
        progress.set_style(style,);
    }
    progress.set_message("Validating logos...",);

    let results: Vec<(&PathBuf, Result<AcceptedLogo, LogoRejection,>,),> = paths
        .par_iter()
        .map(|path| {
            let result = validate(path, rules,);
            progress.inc(1,);
            (path, result,)
        },)
        .collect();
    progress.finish_and_clear();

    let mut report = ValidationReport::default();
    for (path, result,) in results {
        match result {
            Ok(accepted,) => {
                debug!("Accepted {}", path.display());
                report.warnings.extend(accepted.warnings.iter().map(|warning| ReportWarning {
                    path:    path.clone(),
                    message: warning.to_string(),
                },),);
                report.valid.push(path.clone(),);
                report.assets.push(accepted.asset,);
            }
            Err(rejection,) => {
                warn!("Rejected {}: {}", path.display(), rejection);
                report.errors.push(ReportError {
                    path:   path.clone(),
                    kind:   rejection.kind(),
                    reason: rejection.to_string(),
                },);
            }
        }
    }

    info!(
        "Validated {} logo(s): {} valid, {} warning(s), {} error(s)",
        paths.len(),
        report.valid.len(),
        report.warnings.len(),
        report.errors.len()
    );
    report
}
