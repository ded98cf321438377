//! ODF zip package: mimetype, manifest and parts

use std::io::{Read, Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{OdsError, OdsResult};
use crate::xml;
use ods_sheets_core::tag::Tag;

/// Media type of an ODF spreadsheet
pub const MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

const MANIFEST_PATH: &str = "META-INF/manifest.xml";

/// Writes the entries of an `.ods` package
///
/// The `mimetype` entry is written first and uncompressed; `finish`
/// appends a manifest listing every entry added.
pub(crate) struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    manifest: Vec<(String, String)>,
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn new(writer: W) -> OdsResult<Self> {
        let mut zip = ZipWriter::new(writer);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE.as_bytes())?;

        Ok(Self {
            zip,
            manifest: vec![("/".to_string(), MIMETYPE.to_string())],
        })
    }

    /// Serialize `root` and add it as an XML part
    pub fn add_xml(&mut self, path: &str, root: &Tag) -> OdsResult<()> {
        let bytes = xml::to_bytes(root)?;
        self.add_file(path, &bytes, "text/xml")
    }

    pub fn add_file(&mut self, path: &str, bytes: &[u8], media_type: &str) -> OdsResult<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(path, options)?;
        self.zip.write_all(bytes)?;
        self.manifest.push((path.to_string(), media_type.to_string()));
        log::debug!("wrote {} ({} bytes)", path, bytes.len());
        Ok(())
    }

    /// Write the manifest and close the archive
    pub fn finish(mut self) -> OdsResult<W> {
        let mut manifest = Tag::new("manifest:manifest");
        manifest.set_attr("manifest:version", "1.2");
        for (path, media_type) in &self.manifest {
            let entry = manifest.create_child("manifest:file-entry");
            entry.set_attr("manifest:full-path", path.as_str());
            if path == "/" {
                entry.set_attr("manifest:version", "1.2");
            }
            entry.set_attr("manifest:media-type", media_type.as_str());
        }

        let bytes = xml::to_bytes(&manifest)?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(MANIFEST_PATH, options)?;
        self.zip.write_all(&bytes)?;
        Ok(self.zip.finish()?)
    }
}

/// Reads entries of an `.ods` package
pub(crate) struct PackageReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> PackageReader<R> {
    pub fn new(reader: R) -> OdsResult<Self> {
        let mut package = Self {
            archive: ZipArchive::new(reader)?,
        };
        match package.read_bytes("mimetype")? {
            Some(bytes) => {
                let mimetype = String::from_utf8_lossy(&bytes);
                if mimetype.trim() != MIMETYPE {
                    log::warn!("unexpected package mimetype '{}'", mimetype.trim());
                }
            }
            None => log::warn!("package has no mimetype entry"),
        }
        Ok(package)
    }

    /// Bytes of an entry, or `None` when the package has no such entry
    pub fn read_bytes(&mut self, name: &str) -> OdsResult<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    /// Parse an XML entry, or `None` when it is missing
    pub fn read_xml(&mut self, name: &str) -> OdsResult<Option<Tag>> {
        match self.read_bytes(name)? {
            Some(bytes) => Ok(Some(xml::parse(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Parse an XML entry that must be present
    pub fn require_xml(&mut self, name: &str) -> OdsResult<Tag> {
        self.read_xml(name)?
            .ok_or_else(|| OdsError::MissingPart(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn sample_package() -> Vec<u8> {
        let mut writer = PackageWriter::new(Cursor::new(Vec::new())).unwrap();
        let content = Tag::new("office:document-content").with_attr("office:version", "1.2");
        writer.add_xml("content.xml", &content).unwrap();
        writer.add_file("Pictures/image1.png", b"png", "image/png").unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_mimetype_first_and_stored() {
        let bytes = sample_package();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn test_manifest_lists_entries() {
        let mut reader = PackageReader::new(Cursor::new(sample_package())).unwrap();
        let manifest = reader.require_xml(MANIFEST_PATH).unwrap();
        let paths: Vec<&str> = manifest
            .children()
            .iter()
            .filter_map(|e| e.attr("manifest:full-path"))
            .collect();
        assert_eq!(paths, vec!["/", "content.xml", "Pictures/image1.png"]);
        assert_eq!(
            manifest.children()[0].attr("manifest:media-type"),
            Some(MIMETYPE)
        );
    }

    #[test]
    fn test_missing_entries() {
        let mut reader = PackageReader::new(Cursor::new(sample_package())).unwrap();
        assert!(reader.read_bytes("styles.xml").unwrap().is_none());
        assert!(matches!(
            reader.require_xml("styles.xml"),
            Err(OdsError::MissingPart(ref p)) if p == "styles.xml"
        ));
        assert_eq!(reader.read_bytes("Pictures/image1.png").unwrap(), Some(b"png".to_vec()));
    }
}
