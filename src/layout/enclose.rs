// Smallest enclosing circle of a set of circles.
//
// Incremental basis algorithm: walk the circles, and whenever one is not
// weakly enclosed by the current circle, extend the basis (1-3 circles on the
// boundary) with it and restart. Input is shuffled with a fixed-seed LCG so
// results are deterministic.

use super::Circle;

/// Deterministic linear congruential generator in [0, 1).
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub fn new() -> Self {
        Self { state: 1 }
    }

    pub fn next_f64(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new()
    }
}

fn shuffle(circles: &mut [Circle], random: &mut Lcg) {
    let mut m = circles.len();
    while m > 0 {
        let i = (random.next_f64() * m as f64) as usize;
        m -= 1;
        circles.swap(m, i.min(m));
    }
}

/// Enclosing circle of `circles`. Returns a zero circle for empty input.
pub fn enclose(circles: &[Circle], random: &mut Lcg) -> Circle {
    if circles.is_empty() {
        return Circle::default();
    }

    let mut circles = circles.to_vec();
    shuffle(&mut circles, random);

    let n = circles.len();
    let budget = 16 + 4 * n * n;
    let mut basis: Vec<Circle> = Vec::with_capacity(3);
    let mut e: Option<Circle> = None;
    let mut i = 0;
    let mut steps = 0;

    while i < n {
        steps += 1;
        if steps > budget {
            tracing::warn!(circles = n, "enclosing circle did not settle, using bounding circle");
            return bounding_circle(&circles);
        }

        let p = circles[i];
        if let Some(current) = e {
            if encloses_weak(&current, &p) {
                i += 1;
                continue;
            }
        }
        match extend_basis(&basis, p) {
            Some(next) => {
                basis = next;
                e = Some(enclose_basis(&basis));
                i = 0;
            }
            None => {
                tracing::warn!(circles = n, "no enclosing basis found, using bounding circle");
                return bounding_circle(&circles);
            }
        }
    }

    e.unwrap_or_else(|| bounding_circle(&circles))
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &b in basis {
        if encloses_not(&p, &b) && encloses_weak_all(&enclose2(&b, &p), basis) {
            return Some(vec![b, p]);
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(&enclose2(&bi, &bj), &p)
                && encloses_not(&enclose2(&bi, &p), &bj)
                && encloses_not(&enclose2(&bj, &p), &bi)
                && encloses_weak_all(&enclose3(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose2(a, b),
        [a, b, c] => enclose3(a, b, c),
        _ => bounding_circle(basis),
    }
}

fn enclose2(a: &Circle, b: &Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = (x21 * x21 + y21 * y21).sqrt();
    if l == 0.0 {
        return if a.r >= b.r { *a } else { *b };
    }
    Circle {
        x: (a.x + b.x + x21 / l * r21) / 2.0,
        y: (a.y + b.y + y21 / l * r21) / 2.0,
        r: (l + a.r + b.r) / 2.0,
    }
}

fn enclose3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    if ab == 0.0 {
        // collinear centers
        return bounding_circle(&[*a, *b, *c]);
    }
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).max(0.0).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    if !r.is_finite() {
        return bounding_circle(&[*a, *b, *c]);
    }
    Circle { x: x1 + xa + xb * r, y: y1 + ya + yb * r, r }
}

/// Not minimal, but always encloses: centered on the bounding box center.
pub fn bounding_circle(circles: &[Circle]) -> Circle {
    if circles.is_empty() {
        return Circle::default();
    }
    let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for c in circles {
        x0 = x0.min(c.x - c.r);
        y0 = y0.min(c.y - c.r);
        x1 = x1.max(c.x + c.r);
        y1 = y1.max(c.y + c.r);
    }
    let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let r = circles
        .iter()
        .map(|c| ((c.x - cx).powi(2) + (c.y - cy).powi(2)).sqrt() + c.r)
        .fold(0.0, f64::max);
    Circle { x: cx, y: cy, r }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(outer: &Circle, inner: &Circle) -> bool {
        let d = ((outer.x - inner.x).powi(2) + (outer.y - inner.y).powi(2)).sqrt();
        d + inner.r <= outer.r + 1e-6
    }

    #[test]
    fn test_single_circle() {
        let c = Circle { x: 3.0, y: -2.0, r: 5.0 };
        assert_eq!(enclose(&[c], &mut Lcg::new()), c);
    }

    #[test]
    fn test_two_equal_circles() {
        let a = Circle { x: -1.0, y: 0.0, r: 1.0 };
        let b = Circle { x: 1.0, y: 0.0, r: 1.0 };
        let e = enclose(&[a, b], &mut Lcg::new());
        assert!((e.x).abs() < 1e-9);
        assert!((e.y).abs() < 1e-9);
        assert!((e.r - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_encloses_many() {
        let circles: Vec<Circle> = (0..30)
            .map(|i| {
                let t = i as f64 * 0.7;
                Circle { x: t.cos() * i as f64, y: t.sin() * i as f64, r: 1.0 + (i % 4) as f64 }
            })
            .collect();
        let e = enclose(&circles, &mut Lcg::new());
        assert!(circles.iter().all(|c| contains(&e, c)));
        let bb = bounding_circle(&circles);
        assert!(e.r <= bb.r + 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let circles: Vec<Circle> = (0..12)
            .map(|i| Circle { x: (i * 7 % 5) as f64, y: (i * 3 % 4) as f64, r: 0.5 + i as f64 * 0.1 })
            .collect();
        assert_eq!(enclose(&circles, &mut Lcg::new()), enclose(&circles, &mut Lcg::new()));
    }

    #[test]
    fn test_lcg_range() {
        let mut lcg = Lcg::new();
        for _ in 0..1000 {
            let v = lcg.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
