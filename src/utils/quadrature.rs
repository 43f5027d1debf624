/// Adaptive Simpson quadrature.
///
/// Integrates smooth functions to a requested absolute tolerance by recursive
/// interval bisection. Functions with kinks (piecewise-linear chord laws) should be
/// integrated with [`AdaptiveSimpson::integrate_piecewise`] so that every kink is an
/// interval end point.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveSimpson {
    pub tolerance: f64,
    pub max_depth: u32,
}

impl Default for AdaptiveSimpson {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_depth: 40,
        }
    }
}

struct Panel {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
}

impl AdaptiveSimpson {
    /// Integral of `f` over `[a, b]`. Returns 0 for an empty interval.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F, a: f64, b: f64) -> f64 {
        if a == b {
            return 0.0;
        }
        let (lo, hi, sign) = if a < b { (a, b, 1.0) } else { (b, a, -1.0) };
        let fa = f(lo);
        let fb = f(hi);
        let fm = f(0.5 * (lo + hi));
        let panel = Panel {
            a: lo,
            b: hi,
            fa,
            fm,
            fb,
            whole: simpson(lo, hi, fa, fm, fb),
        };
        sign * self.refine(&f, panel, self.tolerance, self.max_depth)
    }

    /// Integral of `f` over `[a, b]`, split at every breakpoint strictly inside the interval.
    pub fn integrate_piecewise<F: Fn(f64) -> f64>(
        &self,
        f: F,
        a: f64,
        b: f64,
        breakpoints: &[f64],
    ) -> f64 {
        let (lo, hi, sign) = if a <= b { (a, b, 1.0) } else { (b, a, -1.0) };
        let mut nodes: Vec<f64> = breakpoints
            .iter()
            .copied()
            .filter(|&x| x > lo && x < hi)
            .collect();
        nodes.sort_by(|x, y| x.total_cmp(y));
        nodes.dedup();

        let mut total = 0.0;
        let mut start = lo;
        for end in nodes.into_iter().chain(std::iter::once(hi)) {
            total += self.integrate(&f, start, end);
            start = end;
        }
        sign * total
    }

    fn refine<F: Fn(f64) -> f64>(&self, f: &F, panel: Panel, tolerance: f64, depth: u32) -> f64 {
        let Panel {
            a,
            b,
            fa,
            fm,
            fb,
            whole,
        } = panel;
        let m = 0.5 * (a + b);
        let flm = f(0.5 * (a + m));
        let frm = f(0.5 * (m + b));
        let left = simpson(a, m, fa, flm, fm);
        let right = simpson(m, b, fm, frm, fb);
        let delta = left + right - whole;

        if depth == 0 || delta.abs() <= 15.0 * tolerance {
            // Richardson extrapolation
            return left + right + delta / 15.0;
        }

        let left_panel = Panel {
            a,
            b: m,
            fa,
            fm: flm,
            fb: fm,
            whole: left,
        };
        let right_panel = Panel {
            a: m,
            b,
            fa: fm,
            fm: frm,
            fb,
            whole: right,
        };
        self.refine(f, left_panel, 0.5 * tolerance, depth - 1)
            + self.refine(f, right_panel, 0.5 * tolerance, depth - 1)
    }
}

#[inline]
fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}
