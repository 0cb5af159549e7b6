// src/grid.rs
//! Двумерная сетка с построчным хранением
//!
//! Все карты движка (рельеф, типы местности, слои) хранятся как плоский вектор
//! `height × width` с индексом `y * width + x`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// 4-связное соседство
pub const DIRECTIONS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Прямоугольная сетка значений, построчно
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub data: Vec<T>,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Собирает сетку из плоского вектора.
    ///
    /// Возвращает `None`, если длина не совпадает с `width * height`.
    #[must_use]
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Обратное преобразование индекса в `(x, y)`
    #[must_use]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }

    #[must_use]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Доступ по знаковым координатам: выход за границы даёт `None`
    #[must_use]
    pub fn get_signed(&self, x: i64, y: i64) -> Option<&T> {
        if self.in_bounds(x, y) {
            self.data.get(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Строки сетки сверху вниз
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) паникует, поэтому пустая сетка отдаёт пустой итератор
        self.data.chunks(self.width.max(1)).take(self.height)
    }

    /// Соседи клетки по 4 направлениям в пределах сетки
    pub fn neighbors4(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            self.in_bounds(nx, ny).then_some((nx as usize, ny as usize))
        })
    }

    /// Сетка тех же размеров с преобразованными значениями
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

/// Вычисляет значение для каждого индекса `0..len`.
///
/// С фичей `parallel` работает через rayon, порядок результата сохраняется.
pub(crate) fn map_cells<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..len).map(f).collect()
    }
}

/// Как [`map_cells`], но отбрасывает `None`.
pub(crate) fn filter_map_cells<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> Option<T> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..len).into_par_iter().filter_map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..len).filter_map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_and_coords_are_inverse() {
        let grid = Grid::new(4, 3, 0u8);
        for idx in 0..grid.len() {
            let (x, y) = grid.coords(idx);
            assert_eq!(grid.index(x, y), idx);
        }
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let grid = Grid::new(2, 2, 1u8);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get_signed(-1, 0), None);
        assert_eq!(grid.get_signed(1, 1), Some(&1));
    }

    #[test]
    fn test_neighbors_at_corner() {
        let grid = Grid::new(3, 3, ());
        let mut n: Vec<_> = grid.neighbors4(0, 0).collect();
        n.sort_unstable();
        assert_eq!(n, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_rows_of_empty_grid() {
        let grid: Grid<u8> = Grid::default();
        assert_eq!(grid.rows().count(), 0);
    }

    #[test]
    fn test_map_cells_keeps_order() {
        let out = map_cells(100, |i| i * 2);
        assert_eq!(out, (0..100).map(|i| i * 2).collect::<Vec<_>>());

        let odd = filter_map_cells(10, |i| (i % 2 == 1).then_some(i));
        assert_eq!(odd, vec![1, 3, 5, 7, 9]);
    }
}
