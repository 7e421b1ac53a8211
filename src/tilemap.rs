use thiserror::Error;

/// Errors raised by grid construction and cell access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Coordinate outside `0..width` x `0..height`
    #[error("cell ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Width or height of zero
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Backing buffer does not hold exactly `width * height` values
    #[error("grid data has {actual} values, expected {expected}")]
    DataLength { expected: usize, actual: usize },
}

/// A dense 2D grid stored row by row.
///
/// Unlike a planet map this grid has hard edges: every accessor fails on
/// coordinates outside the grid instead of wrapping or clamping them.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::new_with(width, height, T::default())
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; width * height],
        })
    }
}

impl<T> Tilemap<T> {
    /// Wrap an existing row-major buffer (`data[y * width + x]`).
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        check_dimensions(width, height)?;
        let expected = width * height;
        if data.len() != expected {
            return Err(GridError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// True when the cell touches any side of the grid.
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if self.contains(x, y) {
            Ok(y * self.width + x)
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&T, GridError> {
        let idx = self.index(x, y)?;
        Ok(&self.data[idx])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Result<&mut T, GridError> {
        let idx = self.index(x, y)?;
        Ok(&mut self.data[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) -> Result<(), GridError> {
        let idx = self.index(x, y)?;
        self.data[idx] = value;
        Ok(())
    }

    /// Raw row-major values.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    pub fn into_values(self) -> Vec<T> {
        self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Build a new map of the same shape by transforming every value.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Tilemap<U> {
        Tilemap {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Copy> Tilemap<T> {
    /// The 3x3 block centred on `(x, y)`, indexed `[dx][dy]` with the centre at `[1][1]`.
    ///
    /// Fails if any part of the window falls outside the grid, so it is only
    /// usable on interior cells.
    pub fn window_3x3(&self, x: usize, y: usize) -> Result<[[T; 3]; 3], GridError> {
        if x == 0 || y == 0 || x + 1 >= self.width || y + 1 >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let centre = self.data[y * self.width + x];
        let mut window = [[centre; 3]; 3];
        for (dx, column) in window.iter_mut().enumerate() {
            for (dy, cell) in column.iter_mut().enumerate() {
                *cell = self.data[(y + dy - 1) * self.width + (x + dx - 1)];
            }
        }
        Ok(window)
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Tilemap::new_with(0, 4, 1.0f32).unwrap_err(),
            GridError::InvalidDimensions { width: 0, height: 4 }
        );
        assert!(Tilemap::<f32>::new(3, 0).is_err());
    }

    #[test]
    fn test_out_of_bounds_does_not_wrap() {
        let mut map = Tilemap::new_with(4, 3, 0u8).unwrap();
        assert_eq!(
            map.get(4, 0).unwrap_err(),
            GridError::OutOfBounds { x: 4, y: 0, width: 4, height: 3 }
        );
        assert!(map.set(0, 3, 1).is_err());
        assert!(map.get_mut(usize::MAX, 1).is_err());

        map.set(3, 2, 7).unwrap();
        assert_eq!(*map.get(3, 2).unwrap(), 7);
        assert_eq!(map.values()[2 * 4 + 3], 7);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert_eq!(
            Tilemap::from_vec(2, 2, vec![1, 2, 3]).unwrap_err(),
            GridError::DataLength { expected: 4, actual: 3 }
        );
        let map = Tilemap::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(*map.get(1, 1).unwrap(), 4);
    }

    #[test]
    fn test_dimensions_fixed_at_construction() {
        let mut map = Tilemap::from_vec(5, 5, vec![0.0f32; 25]).unwrap();
        for (_, _, v) in map.iter_mut() {
            *v += 1.0;
        }
        assert_eq!((map.width(), map.height()), (5, 5));
        assert_eq!(map.values().len(), 25);

        let doubled = map.map(|&v| v * 2.0);
        assert_eq!((doubled.width(), doubled.height()), (5, 5));
        assert!(doubled.get(5, 4).is_err());
        assert_eq!(*doubled.get(4, 4).unwrap(), 2.0);
    }

    #[test]
    fn test_edges() {
        let map = Tilemap::new_with(5, 4, 0.0f32).unwrap();
        assert!(map.is_edge(0, 2));
        assert!(map.is_edge(4, 1));
        assert!(map.is_edge(2, 0));
        assert!(map.is_edge(2, 3));
        assert!(!map.is_edge(1, 1));
        assert!(!map.is_edge(3, 2));
    }

    #[test]
    fn test_window_layout() {
        let mut map = Tilemap::new_with(4, 4, 0i32).unwrap();
        for (x, y, v) in map.iter_mut() {
            *v = (x * 10 + y) as i32;
        }

        let window = map.window_3x3(1, 2).unwrap();
        assert_eq!(window[1][1], 12);
        assert_eq!(window[0][0], 1);
        assert_eq!(window[2][0], 21);
        assert_eq!(window[0][2], 3);

        assert!(map.window_3x3(0, 1).is_err());
        assert!(map.window_3x3(1, 3).is_err());
    }

    #[test]
    fn test_iter_coordinates() {
        let map = Tilemap::new_with(3, 2, 0u8).unwrap();
        let coords: Vec<(usize, usize)> = map.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }
}
