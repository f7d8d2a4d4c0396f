//! Path-based convenience wrappers over [`crate::reader`] and
//! [`crate::writer`]: the four library entry points named in spec §6
//! (`read_tiff`, `write_tiff`, plus the `ops` command functions).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::{fs, process};

use crate::error::RetiffResult;
use crate::model::{FileSource, TiffInfo};
use crate::writer::WriterOptions;
use crate::{reader, writer};

/// Read a classic or BigTIFF file from `path` into a [`TiffInfo`].
pub fn read_tiff(path: impl AsRef<Path>) -> RetiffResult<TiffInfo> {
    let source = Arc::new(FileSource::open(path)?);
    reader::read_tiff(source)
}

/// Write `info` to `path` as a classic or BigTIFF file.
///
/// The file is written to a temporary path beside `path` first and
/// renamed into place on success, so a failed or interrupted write never
/// leaves a partial file at the destination (spec §7).
pub fn write_tiff(info: &TiffInfo, path: impl AsRef<Path>, options: &WriterOptions) -> RetiffResult<()> {
    let path = path.as_ref();
    let tmp_path = temp_path_beside(path);

    let result = (|| -> RetiffResult<()> {
        let file = File::create(&tmp_path)?;
        let mut out = BufWriter::new(file);
        writer::write_tiff(info, &mut out, options)?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            fs::rename(&tmp_path, path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

/// Build a sibling temp path `<dir>/.<filename>.<pid>.tmp` so concurrent
/// writers targeting the same destination never collide.
fn temp_path_beside(path: &Path) -> std::path::PathBuf {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let tmp_name = format!(".{file_name}.{}.tmp", process::id());
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(tmp_name),
        _ => std::path::PathBuf::from(tmp_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryValue, Ifd, MemorySource, TagEntry, TiffInfo};
    use crate::registry::TagSet;
    use crate::types::{ByteOrder, Datatype};

    fn sample_info() -> TiffInfo {
        let source: Arc<dyn crate::model::ByteSource> = Arc::new(MemorySource::new(Vec::<u8>::new()));
        let mut ifd = Ifd::new(TagSet::Tiff, source.clone());
        ifd.insert(TagEntry {
            tag: 256,
            datatype: Datatype::Short,
            count: 1,
            value: EntryValue::Bytes(vec![0x10, 0x00]),
        });
        TiffInfo {
            byte_order: ByteOrder::LittleEndian,
            big_tiff: false,
            version: 42,
            ifds: vec![ifd],
            warnings: Vec::new(),
            source,
        }
    }

    #[test]
    fn round_trips_through_a_real_file() {
        let dir = std::env::temp_dir().join(format!("retiff-api-test-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.tif");

        let info = sample_info();
        write_tiff(&info, &path, &WriterOptions::default()).unwrap();
        assert!(path.exists());

        let read_back = read_tiff(&path).unwrap();
        assert_eq!(read_back.ifds.len(), 1);
        assert_eq!(read_back.ifds[0].get(256).unwrap().as_u64s(read_back.byte_order).unwrap(), vec![0x10]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn no_partial_file_left_on_temp_path_after_success() {
        let dir = std::env::temp_dir().join(format!("retiff-api-test2-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.tif");

        write_tiff(&sample_info(), &path, &WriterOptions::default()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        fs::remove_dir_all(&dir).ok();
    }
}
