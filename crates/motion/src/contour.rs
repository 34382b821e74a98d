use base::Vec2;

// neighbour offsets, clockwise on screen (y grows downward) starting west
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

const WEST: usize = 0;

fn direction_of(dx: isize, dy: isize) -> usize {
    DIRECTIONS
        .iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(WEST)
}

/// Outer boundary of one 8-connected region, as pixel centres in tracing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Vec2<isize>>,
}

impl Contour {
    /// Polygon area of the boundary (shoelace formula).
    ///
    /// Vertices sit on pixel centres, so a filled n x n square measures
    /// (n - 1)², and single pixels and straight lines measure zero.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0isize;
        for i in 0..n {
            let a = &self.points[i];
            let b = &self.points[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice.unsigned_abs() as f64 / 2.0
    }
}

/// Lazily yields the outer contour of every region in a binary mask.
///
/// Regions are discovered in raster order. A region is traced when its first
/// pixel is reached and then flood-filled so it is never reported twice.
pub struct Contours<'a> {
    mask: &'a [bool],
    size: Vec2<usize>,
    visited: Vec<bool>,
    cursor: usize,
}

impl<'a> Contours<'a> {
    /// `mask` holds `size.x * size.y` flags, row-major.
    pub fn new(mask: &'a [bool], size: Vec2<usize>) -> Self {
        let len = size.area().min(mask.len());
        Self {
            mask: &mask[..len],
            size,
            visited: vec![false; len],
            cursor: 0,
        }
    }

    fn is_set(&self, x: isize, y: isize) -> bool {
        self.size.contains(x, y) && self.mask[y as usize * self.size.x + x as usize]
    }

    // one Moore step: sweep clockwise from the backtrack neighbour
    fn step(&self, p: Vec2<isize>, back: usize) -> Option<(Vec2<isize>, usize)> {
        for k in 1..=8 {
            let (dx, dy) = DIRECTIONS[(back + k) % 8];
            let q = Vec2::new(p.x + dx, p.y + dy);
            if self.is_set(q.x, q.y) {
                let (cx, cy) = DIRECTIONS[(back + k - 1) % 8];
                let next_back = direction_of(p.x + cx - q.x, p.y + cy - q.y);
                return Some((q, next_back));
            }
        }
        None
    }

    fn trace(&self, start: Vec2<isize>) -> Contour {
        // the raster scan guarantees the west neighbour of `start` is background
        let Some(first) = self.step(start, WEST) else {
            return Contour {
                points: vec![start],
            };
        };

        let mut points = vec![start];
        let (mut p, mut back) = first;
        let limit = 4 * self.mask.len() + 8;
        while points.len() < limit {
            let Some((next, next_back)) = self.step(p, back) else {
                break;
            };
            if p == start && next == first.0 {
                break;
            }
            points.push(p);
            p = next;
            back = next_back;
        }
        Contour { points }
    }

    fn fill(&mut self, seed: usize) {
        let width = self.size.x;
        let mut stack = vec![seed];
        self.visited[seed] = true;
        while let Some(index) = stack.pop() {
            let x = (index % width) as isize;
            let y = (index / width) as isize;
            for (dx, dy) in DIRECTIONS {
                let (nx, ny) = (x + dx, y + dy);
                if self.is_set(nx, ny) {
                    let n = ny as usize * width + nx as usize;
                    if !self.visited[n] {
                        self.visited[n] = true;
                        stack.push(n);
                    }
                }
            }
        }
    }
}

impl Iterator for Contours<'_> {
    type Item = Contour;

    fn next(&mut self) -> Option<Contour> {
        while self.cursor < self.mask.len() {
            let index = self.cursor;
            self.cursor += 1;
            if !self.mask[index] || self.visited[index] {
                continue;
            }
            let start = Vec2::new(
                (index % self.size.x) as isize,
                (index / self.size.x) as isize,
            );
            let contour = self.trace(start);
            self.fill(index);
            return Some(contour);
        }
        None
    }
}
