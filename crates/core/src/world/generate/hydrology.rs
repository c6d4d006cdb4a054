use crate::{
    config::HydrologyConfig,
    util::cmp_unwrap,
    world::{
        generate::{CellBuilder, Generate, WorldBuilder},
        grid::Grid,
        hex::HexPoint,
    },
};
use anyhow::Context;
use fnv::FnvHashMap;
use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};

/// Places springs on high ground and walks a river downhill from each one.
/// Rivers stop when they hit the sea, a local minimum (which becomes a lake),
/// the edge of the map, or the step cap.
///
/// Walks run one at a time on a single random stream, so the same hydrology
/// seed always produces the same rivers.
#[derive(Copy, Clone, Debug)]
pub struct HydrologyGenerator;

impl Generate for HydrologyGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let config = world.config.hydrology;

        let springs = select_springs(&world.cells, &config, &mut world.rng)?;
        debug!("Selected {} springs", springs.len());

        let mut outcomes: FnvHashMap<WalkOutcome, usize> =
            FnvHashMap::default();
        for spring in springs {
            // A previous river already flowed through here
            if world.cells[spring].is_river() {
                continue;
            }

            let outcome = walk(
                &mut world.cells,
                spring,
                config.sea_threshold,
                config.max_steps,
                &mut world.rng,
            )
            .with_context(|| format!("error walking river from {}", spring))?;
            *outcomes.entry(outcome).or_default() += 1;
        }

        debug!(
            "Walk outcomes: {:?}; {} river cells, {} lakes",
            outcomes,
            world.cells.iter().filter(|cell| cell.is_river()).count(),
            world.cells.iter().filter(|cell| cell.is_lake()).count(),
        );
        Ok(())
    }
}

/// Pick which cells rivers will start from. Every cell at or above the
/// minimum spring elevation is a candidate, and a random subset of them is
/// chosen. The target count is proportional to the size of the world, with a
/// minimum of one.
fn select_springs(
    cells: &Grid<CellBuilder>,
    config: &HydrologyConfig,
    rng: &mut impl Rng,
) -> anyhow::Result<Vec<HexPoint>> {
    let mut candidates = Vec::new();
    for cell in cells.iter() {
        if cell.elevation()? >= config.spring_min_elevation {
            candidates.push(cell.position());
        }
    }

    let target =
        ((cells.len() as f64 * config.spring_density).round() as usize).max(1);
    candidates.shuffle(rng);
    candidates.truncate(target);
    Ok(candidates)
}

/// How a river walk ended
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WalkOutcome {
    /// No neighbor was strictly lower, so the last cell became a lake
    Lake,
    /// The next cell was below the sea threshold. That cell was marked as
    /// the river mouth, and the walk stopped there.
    ReachedSea,
    /// Walked the maximum number of steps without ending naturally
    StepCap,
    /// The cell had no neighbors at all (only possible on a 1x1 world)
    Isolated,
}

/// Walk a single river downhill from the given spring, marking every cell it
/// passes through. At each step, the neighbors are shuffled before finding
/// the lowest one, so ties in elevation are broken randomly (but
/// reproducibly, for a given RNG state).
pub fn walk(
    cells: &mut Grid<CellBuilder>,
    spring: HexPoint,
    sea_threshold: f64,
    max_steps: usize,
    rng: &mut impl Rng,
) -> anyhow::Result<WalkOutcome> {
    let mut current = spring;
    for step in 0..max_steps {
        cells[current].mark_river();
        let current_elevation = cells[current].elevation()?;

        let mut neighbors = cells
            .neighbors(current)
            .map(|p| -> anyhow::Result<(HexPoint, f64)> {
                Ok((p, cells[p].elevation()?))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        neighbors.shuffle(rng);

        // min_by keeps the first of equal elements, so the shuffle decides
        // ties
        let lowest = neighbors
            .into_iter()
            .min_by(|(_, a), (_, b)| cmp_unwrap(a, b));
        let (next, next_elevation) = match lowest {
            Some(lowest) => lowest,
            None => {
                trace!("River from {} is isolated", spring);
                return Ok(WalkOutcome::Isolated);
            }
        };

        if next_elevation >= current_elevation {
            trace!(
                "River from {} pooled into a lake at {} after {} steps",
                spring,
                current,
                step + 1
            );
            cells[current].mark_lake();
            return Ok(WalkOutcome::Lake);
        }

        if next_elevation < sea_threshold {
            trace!(
                "River from {} reached the sea at {} after {} steps",
                spring,
                next,
                step + 1
            );
            cells[next].mark_river();
            return Ok(WalkOutcome::ReachedSea);
        }

        current = next;
    }

    trace!("River from {} hit the step cap at {}", spring, current);
    Ok(WalkOutcome::StepCap)
}
