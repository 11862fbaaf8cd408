use crate::vector::Vector;

/// Every grid cell the straight segment from `start` to `end` passes through, both ends included.
///
/// Bresenham rasterisation: the axis with the larger distance advances one cell per step and the
/// error term decides when the other axis follows with a diagonal step. The result always holds
/// `max(|dx|, |dy|) + 1` points.
pub fn trace(start: Vector, end: Vector) -> Vec<Vector> {
    let diff = end - start;
    let (dist_x, dist_y) = (diff.x.abs(), diff.y.abs());
    let (dir_x, dir_y) = (diff.x.signum(), diff.y.signum());

    let (parallel_step, fast_distance, slow_distance) = if dist_x > dist_y {
        (Vector::new(dir_x, 0), dist_x, dist_y)
    } else {
        (Vector::new(0, dir_y), dist_y, dist_x)
    };
    let diagonal_step = Vector::new(dir_x, dir_y);

    let mut path = Vec::with_capacity(fast_distance.unsigned_abs() as usize + 1);
    let mut point = start;
    let mut error = fast_distance / 2;
    path.push(point);

    for _ in 0..fast_distance {
        error -= slow_distance;
        if error < 0 {
            error += fast_distance;
            point += diagonal_step;
        } else {
            point += parallel_step;
        }
        path.push(point);
    }

    path
}
