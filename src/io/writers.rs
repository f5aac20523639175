use crate::error::Result;
use crate::fragment::Fragment;
use crate::graph::WeightMatrix;
use crate::layout::Layout;
use crate::optimizer::{GaParams, Solution};
use bio::io::fasta;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One row per line, space separated matched lengths; masked cells as -1
pub fn write_matrix(path: &Path, matrix: &WeightMatrix) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for row in matrix.weights() {
        let line: Vec<String> = row.iter().map(|w| w.to_string()).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// One fragment per line, in index order
pub fn write_fragments(path: &Path, fragments: &[Fragment]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for fragment in fragments {
        writer.write_all(fragment.seq())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Tour indices on one line, followed by the run parameters and score as
/// `#` comments
pub fn write_tour(path: &Path, solution: &Solution, params: Option<&GaParams>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let tour: Vec<String> = solution.tour.iter().map(|i| i.to_string()).collect();
    writeln!(writer, "{}", tour.join(" "))?;
    if let Some(params) = params {
        writeln!(writer, "# Parameters were: {params}")?;
    }
    writeln!(writer, "# Score was: {}", solution.score)?;
    writer.flush()?;
    Ok(())
}

/// Each fragment on its own row, shifted right by its offset in empty cells,
/// one base per cell
pub fn write_layout_csv(path: &Path, layout: &Layout, fragments: &[Fragment]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    for placement in &layout.placements {
        let mut record: Vec<String> = vec![String::new(); placement.offset];
        record.extend(
            fragments[placement.index]
                .seq()
                .iter()
                .map(|&base| char::from(base).to_string()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reconstructed sequence as a single FASTA record
pub fn write_assembly(path: &Path, id: &str, layout: &Layout) -> Result<()> {
    let mut writer = fasta::Writer::to_file(path)?;
    let description = format!("length={} fragments={}", layout.span(), layout.placements.len());
    writer.write(id, Some(description.as_str()), &layout.sequence)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::test_support::chain;
    use crate::optimizer::RunContext;
    use crate::overlap::ScoringConfig;
    use std::env::temp_dir;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_path(ext: &str) -> PathBuf {
        let mut file_name = temp_dir();
        file_name.push(format!("{}.{ext}", Uuid::new_v4()));
        file_name
    }

    fn read_and_remove(path: PathBuf) -> String {
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(path).unwrap();
        content
    }

    #[test]
    fn test_write_matrix() {
        let (_, graph) = chain();
        let path = temp_path("txt");
        write_matrix(&path, &graph.sense).unwrap();
        assert_eq!(read_and_remove(path), "-1 3 0\n0 -1 3\n0 0 -1\n");
    }

    #[test]
    fn test_write_fragments() {
        let (fragments, _) = chain();
        let path = temp_path("txt");
        write_fragments(&path, &fragments).unwrap();
        assert_eq!(read_and_remove(path), "AAACCC\nCCCGGG\nGGGTTT\n");
    }

    #[test]
    fn test_write_tour() {
        let solution = Solution {
            tour: vec![0, 1, 2],
            score: 6,
            generations: 10,
        };
        let params = GaParams {
            population_size: 40,
            crossover_rate: 0.9,
            mutation_rate: 0.05,
            ..GaParams::default()
        };
        let path = temp_path("txt");
        write_tour(&path, &solution, Some(&params)).unwrap();
        assert_eq!(
            read_and_remove(path),
            "0 1 2\n# Parameters were: Pop size: 40, Crossover rate: 0.9, Mutation rate: 0.05\n# Score was: 6\n"
        );

        let path = temp_path("txt");
        write_tour(&path, &solution, None).unwrap();
        assert_eq!(read_and_remove(path), "0 1 2\n# Score was: 6\n");
    }

    #[test]
    fn test_write_layout_and_assembly() {
        let (fragments, graph) = chain();
        let ctx = RunContext::new(&fragments, &graph, ScoringConfig::default()).unwrap();
        let layout = Layout::from_tour(&ctx, &[0, 1, 2]);

        let path = temp_path("csv");
        write_layout_csv(&path, &layout, &fragments).unwrap();
        let csv = read_and_remove(path);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "A,A,A,C,C,C");
        assert_eq!(lines[1], ",,,C,C,C,G,G,G");
        assert_eq!(lines[2], ",,,,,,G,G,G,T,T,T");

        let path = temp_path("fasta");
        write_assembly(&path, "contig1", &layout).unwrap();
        assert_eq!(
            read_and_remove(path),
            ">contig1 length=12 fragments=3\nAAACCCGGGTTT\n"
        );
    }
}
