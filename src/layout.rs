use crate::optimizer::RunContext;

/// Where one fragment lands in the reconstructed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub offset: usize,
}

/// Fragments of a tour tiled at their offsets, plus the consensus they spell
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    pub sequence: Vec<u8>,
}

const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

fn base_index(base: u8) -> usize {
    match base {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        _ => 3,
    }
}

impl Layout {
    /// Tile fragments along `tour`, each starting where the previous one's
    /// overlap begins, and call every column by majority vote (ties go to
    /// the base first in ACGT order).
    pub fn from_tour(ctx: &RunContext, tour: &[usize]) -> Self {
        let fragments = ctx.fragments();
        let mut placements = Vec::with_capacity(tour.len());
        let mut offset = 0;
        for (k, &index) in tour.iter().enumerate() {
            placements.push(Placement { index, offset });
            if let Some(&next) = tour.get(k + 1) {
                offset += ctx.advance(index, next);
            }
        }

        let span = placements
            .iter()
            .map(|p| p.offset + fragments[p.index].len())
            .max()
            .unwrap_or(0);
        let mut counts = vec![[0u32; 4]; span];
        for p in &placements {
            for (k, &base) in fragments[p.index].seq().iter().enumerate() {
                counts[p.offset + k][base_index(base)] += 1;
            }
        }

        let sequence = counts
            .iter()
            .map(|column| {
                let mut best = 0;
                for b in 1..4 {
                    if column[b] > column[best] {
                        best = b;
                    }
                }
                BASES[best]
            })
            .collect();

        Layout {
            placements,
            sequence,
        }
    }

    /// Length of the reconstructed sequence
    pub fn span(&self) -> usize {
        self.sequence.len()
    }

    pub fn sequence_string(&self) -> String {
        String::from_utf8_lossy(&self.sequence).into_owned()
    }
}
