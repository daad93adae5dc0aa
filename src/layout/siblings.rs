// Front-chain sibling packing.
//
// Places circles one at a time tangent to two circles of the "front chain"
// (the outer boundary of what is already placed), always next to the pair
// closest to the centroid. When the new circle would intersect another chain
// member, the chain is cut back to that member and placement is retried.
//
// Properties:
// - Deterministic for a given input order
// - Siblings never overlap (up to a 1e-6 tolerance in layout units)
// - The result is centered on its enclosing circle
//
// Cost: every placement rescans the whole front chain for the pair closest
// to the centroid, and the chain grows roughly with the square root of the
// circles placed, so one node with n direct children costs about n^1.5.
// A few thousand children pack in well under a frame; a single node with
// tens of thousands of direct children can take several frames. Deep trees
// are unaffected since each node only packs its own children.

use super::Circle;
use super::enclose::{enclose, Lcg};

/// Position `c` tangent to both `a` and `b`.
fn place(b: &Circle, a: &Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r) * (a.r + c.r);
        let b2 = (b.r + c.r) * (b.r + c.r);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of `a` and `b`.
fn score(a: &Circle, b: &Circle) -> f64 {
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Pack `circles` (radii given, positions overwritten) without overlap and
/// center the result on the origin. Returns the enclosing radius.
pub fn pack_siblings(circles: &mut [Circle], random: &mut Lcg) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    let (first, second) = (circles[0], circles[1]);
    place(&second, &first, &mut circles[2]);

    // Front chain as a circular doubly linked list over circle indices.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b) = (0usize, 1usize);
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;

    let mut i = 3;
    'pack: while i < n {
        let (ca, cb) = (circles[a], circles[b]);
        place(&ca, &cb, &mut circles[i]);
        let c = circles[i];

        // Find the closest intersecting circle on the chain, measured by
        // accumulated radius along the chain in each direction.
        let (mut j, mut k) = (next[b], prev[a]);
        let (mut sj, mut sk) = (circles[b].r, circles[a].r);
        loop {
            if sj <= sk {
                if intersects(&circles[j], &c) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &c) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        // Insert i between a and b.
        prev[i] = a;
        next[i] = b;
        next[a] = i;
        prev[b] = i;

        // Move the insertion point to the pair closest to the centroid.
        let mut best = a;
        let mut best_score = score(&circles[a], &circles[next[a]]);
        let mut cur = next[i];
        while cur != i {
            let s = score(&circles[cur], &circles[next[cur]]);
            if s < best_score {
                best = cur;
                best_score = s;
            }
            cur = next[cur];
        }
        a = best;
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cur = next[b];
    while cur != b {
        chain.push(circles[cur]);
        cur = next[cur];
    }
    let e = enclose(&chain, random);

    for circle in circles.iter_mut() {
        circle.x -= e.x;
        circle.y -= e.y;
    }
    e.r
}
