use geo::Relate;

use super::{PolygonId, PolygonRegistry};

/// Touch adjacency between registered polygons, indexed by registry position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbors {
    adjacency: Vec<Vec<usize>>,
}

impl Neighbors {
    /// Two polygons are neighbours when their boundaries meet (edge or point)
    /// and their interiors do not overlap.
    pub(crate) fn compute(registry: &PolygonRegistry) -> Self {
        let mut adjacency = vec![Vec::new(); registry.len()];

        for i in 0..registry.len() {
            for j in registry.candidates(i, 1e-12) {
                if j <= i { continue; }

                let im = registry.at(i).geometry.relate(&registry.at(j).geometry);
                if im.is_touches() {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }
        adjacency.iter_mut().for_each(|list| list.sort_unstable());

        tracing::debug!(
            "determined neighbours for {} polygons ({} touching pairs)",
            registry.len(),
            adjacency.iter().map(Vec::len).sum::<usize>() / 2,
        );
        Self { adjacency }
    }

    /// Registry positions of the polygons touching the polygon at `idx`.
    #[inline] pub fn of(&self, idx: usize) -> &[usize] { &self.adjacency[idx] }

    /// Ids of the polygons touching `id`, empty when `id` is unknown.
    pub fn ids_of(&self, registry: &PolygonRegistry, id: PolygonId) -> Vec<PolygonId> {
        registry.position(id)
            .map(|idx| self.of(idx).iter().map(|&j| registry.at(j).id).collect())
            .unwrap_or_default()
    }

    #[inline] pub fn len(&self) -> usize { self.adjacency.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.adjacency.is_empty() }
}
