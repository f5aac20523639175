use crate::error::Result;
use crate::fragment::Fragment;
use bio::io::fasta;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Load every FASTA record longer than `min_len` as a fragment, in file order.
/// A record with a base outside {A, C, G, T} fails the whole load.
pub fn read_fragments(path: &Path, min_len: usize) -> Result<Vec<Fragment>> {
    let reader = fasta::Reader::new(open(path)?);
    let mut fragments = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = record?;
        if record.seq().len() <= min_len {
            skipped += 1;
            continue;
        }
        match Fragment::new(record.seq()) {
            Ok(fragment) => fragments.push(fragment),
            Err(e) => {
                warn!("record '{}' rejected: {e}", record.id());
                return Err(e);
            }
        }
    }
    debug!(
        "read {} fragments from {} ({skipped} at or below {min_len} bp skipped)",
        fragments.len(),
        path.display()
    );
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::env::temp_dir;
    use std::io::Write;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn create_test_fasta(ext: &str, data: &str) -> PathBuf {
        let mut file_name = temp_dir();
        file_name.push(format!("{}.{ext}", Uuid::new_v4()));
        let mut file = File::create(file_name.clone()).unwrap();
        file.write_all(data.as_bytes()).unwrap();
        file.sync_all().unwrap();
        file_name
    }

    #[test]
    fn test_read_fragments() {
        let path = create_test_fasta(
            "fasta",
            ">frag1 first\nAAAC\nCC\n>frag2\nccc\n>frag3\nCCCGGG\n",
        );
        let fragments = read_fragments(&path, 3).unwrap();
        let seqs: Vec<String> = fragments.iter().map(|f| f.to_string()).collect();
        assert_eq!(seqs, vec!["AAACCC", "CCCGGG"]);

        let all = read_fragments(&path, 0).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].to_string(), "CCC");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_gzipped_fragments() {
        let mut file_name = temp_dir();
        file_name.push(format!("{}.fasta.gz", Uuid::new_v4()));
        let mut encoder = GzEncoder::new(File::create(&file_name).unwrap(), Compression::default());
        encoder.write_all(b">a\nACGTACGT\n>b\nGGGTTT\n").unwrap();
        encoder.finish().unwrap();

        let fragments = read_fragments(&file_name, 3).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].to_string(), "ACGTACGT");
        std::fs::remove_file(file_name).unwrap();
    }

    #[test]
    fn test_invalid_base_fails_load() {
        let path = create_test_fasta("fa", ">a\nACGTN\n");
        let err = read_fragments(&path, 0).unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidSymbol { symbol: b'N', position: 4 }));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = read_fragments(Path::new("/nonexistent/fragments.fasta"), 0).unwrap_err();
        assert!(matches!(err, AssemblyError::Io(_)));
    }
}
