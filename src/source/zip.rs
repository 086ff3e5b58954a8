//! ZIP archive reader; every supported member contributes its tables

use std::io::{Cursor, Read};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::config::Config;
use crate::error::Result;
use crate::model::TableSet;

use super::{ReaderFactory, TableReader};

/// Reader for ZIP archives of tabular files
pub struct ZipReader;

impl TableReader for ZipReader {
    fn read(&self, name: &str, bytes: Vec<u8>, config: &Config) -> Result<TableSet> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let factory = ReaderFactory::without_archives();

        let mut tables = Vec::new();
        for index in 0..archive.len() {
            let (member, contents) = {
                let mut file = archive.by_index(index)?;
                if file.is_dir() {
                    continue;
                }
                let mut contents = Vec::with_capacity(file.size() as usize);
                file.read_to_end(&mut contents)?;
                (file.name().to_string(), contents)
            };

            let Some(reader) = factory.reader_for_name(&member) else {
                warn!(archive = name, member = %member, "skipping unsupported member");
                continue;
            };

            let found = reader.read(&member, contents, config)?.into_tables();
            debug!(archive = name, member = %member, tables = found.len(), "read member");
            if found.len() == 1 {
                tables.extend(found.into_iter().map(|t| t.renamed(member.clone())));
            } else {
                tables.extend(found.into_iter().map(|t| {
                    let qualified = format!("{}:{}", member, t.name());
                    t.renamed(qualified)
                }));
            }
        }

        Ok(TableSet::new(name, tables))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("zip")
    }
}
