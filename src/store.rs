// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Loading and writing JSON provider stores.
//!
//! Stores live inside working directories prepared by the caller. A missing
//! file is an empty store; a file that exists but has the wrong shape is a
//! schema error and aborts the provider before anything is written.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{self, Error};

/// Reads a JSON document, returning `None` when the file does not exist.
///
/// # Errors
///
/// Returns [`Error::Io`] for read failures other than a missing file and
/// [`Error::Schema`] when the contents are not valid JSON.
pub fn read_json(path: &Path,) -> Result<Option<Value,>, Error,>
{
    let contents = match fs::read_to_string(path,) {
        Ok(contents,) => contents,
        Err(source,) if source.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist, starting from an empty store", path.display());
            return Ok(None,);
        }
        Err(source,) => return Err(error::io_error(path, source,),),
    };

    serde_json::from_str(&contents,).map(Some,).map_err(|source| error::schema_error(path, source,),)
}

/// Loads a JSON object store such as a contract map.
///
/// # Errors
///
/// Returns [`Error::Schema`] when the document is not a JSON object.
pub fn load_object(path: &Path,) -> Result<Map<String, Value,>, Error,>
{
    match read_json(path,)? {
        None => Ok(Map::new(),),
        Some(Value::Object(map,),) => Ok(map,),
        Some(other,) => {
            Err(error::schema_error(path, format!("expected a JSON object, found {}", kind(&other)),),)
        }
    }
}

/// Loads a JSON array store whose elements are objects with an `address`.
///
/// # Errors
///
/// Returns [`Error::Schema`] when the document is not an array or an element
/// lacks a string `address` field.
pub fn load_address_array(path: &Path,) -> Result<Vec<Value,>, Error,>
{
    let items = match read_json(path,)? {
        None => return Ok(Vec::new(),),
        Some(Value::Array(items,),) => items,
        Some(other,) => {
            return Err(error::schema_error(
                path,
                format!("expected a JSON array, found {}", kind(&other)),
            ),);
        }
    };

    if let Some(index,) = items.iter().position(|item| address_of(item,).is_none(),) {
        return Err(error::schema_error(path, format!("entry {index} has no string address"),),);
    }

    Ok(items,)
}

/// Returns the `address` field of a store entry, when present.
pub fn address_of(item: &Value,) -> Option<&str,>
{
    item.get("address",).and_then(Value::as_str,)
}

/// JSON document written next to its destination but not yet moved over it.
///
/// Dropping an uncommitted write removes the temporary file, so the target is
/// either the old document or the complete new one.
#[derive(Debug,)]
pub struct StagedWrite
{
    temp:      PathBuf,
    target:    PathBuf,
    committed: bool,
}

impl StagedWrite
{
    /// Destination the document replaces on commit.
    pub fn target(&self,) -> &Path
    {
        &self.target
    }

    /// Renames the staged document over its destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] when the rename fails; the target is left
    /// untouched in that case.
    pub fn commit(mut self,) -> Result<PathBuf, Error,>
    {
        fs::rename(&self.temp, &self.target,)
            .map_err(|source| error::write_error(&self.target, source,),)?;
        self.committed = true;
        Ok(self.target.clone(),)
    }
}

impl Drop for StagedWrite
{
    fn drop(&mut self,)
    {
        if !self.committed {
            let _ = fs::remove_file(&self.temp,);
        }
    }
}

/// Writes `value` as pretty JSON to a hidden sibling of `path`.
///
/// Parent directories are created when missing. Nothing at `path` changes
/// until [`StagedWrite::commit`] is called.
///
/// # Errors
///
/// Returns [`Error::Write`] when directories or the temporary file cannot be
/// written and [`Error::Serialize`] when the value cannot be encoded.
pub fn stage_json<T,>(path: &Path, value: &T,) -> Result<StagedWrite, Error,>
where
    T: Serialize + ?Sized,
{
    if let Some(parent,) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent,).map_err(|source| error::write_error(parent, source,),)?;
    }

    let staged = StagedWrite {
        temp:      temp_path(path,),
        target:    path.to_path_buf(),
        committed: false,
    };

    let file =
        File::create(&staged.temp,).map_err(|source| error::write_error(&staged.temp, source,),)?;
    let mut writer = BufWriter::new(file,);
    serde_json::to_writer_pretty(&mut writer, value,)?;
    writer.write_all(b"\n",).map_err(|source| error::write_error(&staged.temp, source,),)?;
    writer.flush().map_err(|source| error::write_error(&staged.temp, source,),)?;
    debug!("Staged {} for {}", staged.temp.display(), path.display());

    Ok(staged,)
}

/// Writes `value` as pretty JSON followed by a trailing newline.
///
/// The document is staged next to `path` and renamed into place, so a
/// failed write never leaves a truncated store behind.
///
/// # Errors
///
/// Returns [`Error::Write`] when directories or the file cannot be written
/// and [`Error::Serialize`] when the value cannot be encoded.
pub fn write_json<T,>(path: &Path, value: &T,) -> Result<(), Error,>
where
    T: Serialize + ?Sized,
{
    stage_json(path, value,)?.commit().map(|_| (),)
}

fn temp_path(path: &Path,) -> PathBuf
{
    let name = path.file_name().map(|name| name.to_string_lossy().into_owned(),).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"),)
}

fn kind(value: &Value,) -> &'static str
{
    match value {
        Value::Null => "null",
        Value::Bool(_,) => "a boolean",
        Value::Number(_,) => "a number",
        Value::String(_,) => "a string",
        Value::Array(_,) => "an array",
        Value::Object(_,) => "an object",
    }
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use serde_json::json;
    use tempfile::tempdir;

    use super::{load_address_array, load_object, read_json, stage_json, write_json};
    use crate::Error;

    #[test]
    fn missing_file_reads_as_none()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let value = read_json(&temp.path().join("absent.json",),).expect("expected success",);
        assert!(value.is_none());
    }

    #[test]
    fn missing_object_store_is_empty()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let map = load_object(&temp.path().join("contract-map.json",),).expect("expected success",);
        assert!(map.is_empty());
    }

    #[test]
    fn object_store_rejects_arrays()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("contract-map.json",);
        fs::write(&path, "[]",).expect("failed to write store",);

        let error = load_object(&path,).expect_err("expected schema error",);
        assert!(error.to_string().contains("expected a JSON object, found an array"));
    }

    #[test]
    fn object_store_preserves_key_order()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("contract-map.json",);
        fs::write(&path, r#"{"0xzz": {}, "0xaa": {}, "0xmm": {}}"#,).expect("failed to write",);

        let map = load_object(&path,).expect("expected success",);
        let keys: Vec<&str,> = map.keys().map(String::as_str,).collect();
        assert_eq!(keys, ["0xzz", "0xaa", "0xmm"]);
    }

    #[test]
    fn array_store_requires_addresses()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("ethereum.json",);
        fs::write(&path, r#"[{"address": "0x1"}, {"symbol": "X"}]"#,).expect("failed to write",);

        let error = load_address_array(&path,).expect_err("expected schema error",);
        match error {
            Error::Schema {
                message, ..
            } => assert_eq!(message, "entry 1 has no string address"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_schema_error()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("ethereum.json",);
        fs::write(&path, "{not json",).expect("failed to write",);

        assert!(matches!(load_address_array(&path), Err(Error::Schema { .. })));
    }

    #[test]
    fn write_json_creates_parents_and_appends_newline()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("src/tokens/ethereum.json",);

        write_json(&path, &json!([{"address": "0x1"}]),).expect("expected write to succeed",);

        let written = fs::read_to_string(&path,).expect("failed to read store",);
        assert!(written.ends_with("]\n"));
        assert!(written.contains("\"address\": \"0x1\""));
    }

    #[test]
    fn write_json_leaves_no_temporary_file()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("contract-map.json",);

        write_json(&path, &json!({"0x1": {}}),).expect("expected write to succeed",);

        let names: Vec<String,> = fs::read_dir(temp.path(),)
            .expect("failed to list dir",)
            .map(|entry| entry.expect("bad entry",).file_name().to_string_lossy().into_owned(),)
            .collect();
        assert_eq!(names, ["contract-map.json"]);
    }

    #[test]
    fn uncommitted_stage_keeps_target_and_cleans_up()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("ethereum.json",);
        fs::write(&path, "[]",).expect("failed to write store",);

        let staged = stage_json(&path, &json!([{"address": "0x1"}]),).expect("expected stage",);
        assert_eq!(staged.target(), path);
        assert!(temp.path().join(".ethereum.json.tmp").exists());
        drop(staged,);

        assert_eq!(fs::read_to_string(&path,).expect("store missing",), "[]");
        assert!(!temp.path().join(".ethereum.json.tmp").exists());
    }

    #[test]
    fn committed_stage_replaces_target()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("ethereum.json",);
        fs::write(&path, "[]",).expect("failed to write store",);

        let staged = stage_json(&path, &json!([{"address": "0x1"}]),).expect("expected stage",);
        let written = staged.commit().expect("expected commit",);

        assert_eq!(written, path);
        assert!(fs::read_to_string(&path,).expect("store missing",).contains("0x1"));
        assert!(!temp.path().join(".ethereum.json.tmp").exists());
    }
}
