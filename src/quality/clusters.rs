// src/quality/clusters.rs
use petgraph::unionfind::UnionFind;

use crate::grid::Grid;

/// Статистика связных скоплений ресурсов
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClusterStats {
    pub cluster_count: usize,
    pub average_cluster_size: f64,
    pub max_cluster_size: usize,
}

/// Группирует занятые клетки в 4-связные скопления.
///
/// Одиночные клетки скоплением не считаются.
#[must_use]
pub fn analyze_resource_clusters(occupied: &Grid<bool>) -> ClusterStats {
    let n = occupied.len();
    if n == 0 {
        return ClusterStats::default();
    }

    let mut sets = UnionFind::<usize>::new(n);
    for y in 0..occupied.height {
        for x in 0..occupied.width {
            let idx = occupied.index(x, y);
            if !occupied.data[idx] {
                continue;
            }
            // Достаточно правого и нижнего соседа: остальные рёбра уже учтены
            if x + 1 < occupied.width && occupied.data[idx + 1] {
                sets.union(idx, idx + 1);
            }
            if y + 1 < occupied.height && occupied.data[idx + occupied.width] {
                sets.union(idx, idx + occupied.width);
            }
        }
    }

    let mut sizes = vec![0usize; n];
    for idx in (0..n).filter(|&i| occupied.data[i]) {
        sizes[sets.find_mut(idx)] += 1;
    }

    let clusters: Vec<usize> = sizes.into_iter().filter(|&s| s > 1).collect();
    if clusters.is_empty() {
        return ClusterStats::default();
    }

    ClusterStats {
        cluster_count: clusters.len(),
        average_cluster_size: clusters.iter().sum::<usize>() as f64 / clusters.len() as f64,
        max_cluster_size: clusters.iter().copied().max().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied(rows: &[&str]) -> Grid<bool> {
        let width = rows.first().map_or(0, |r| r.len());
        let data = rows.iter().flat_map(|r| r.chars().map(|c| c == '#')).collect();
        Grid::from_vec(width, rows.len(), data).unwrap()
    }

    #[test]
    fn test_clusters_ignore_singletons() {
        let g = occupied(&["##..#", "#....", "...##", "#..##"]);
        let stats = analyze_resource_clusters(&g);
        // {3 клетки слева сверху} и {4 клетки справа снизу}
        assert_eq!(stats.cluster_count, 2);
        assert_eq!(stats.max_cluster_size, 4);
        assert!((stats.average_cluster_size - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(analyze_resource_clusters(&Grid::default()), ClusterStats::default());
    }
}
