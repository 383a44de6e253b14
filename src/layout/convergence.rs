use super::LayoutRect;

/// Best fitness of one generation; generations are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergencePoint {
    pub generation: u32,
    pub fitness: f64,
}

pub fn convergence_points(history: &[f64]) -> Vec<ConvergencePoint> {
    history
        .iter()
        .enumerate()
        .map(|(i, &fitness)| ConvergencePoint {
            generation: i as u32 + 1,
            fitness,
        })
        .collect()
}

/// Points mapped into a plot rectangle, with the value ranges used for the axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub plot: LayoutRect,
    pub generations: (u32, u32),
    pub fitness_range: (f64, f64),
    pub polyline: Vec<(f64, f64)>,
}

impl ChartGeometry {
    pub fn fit(points: &[ConvergencePoint], plot: LayoutRect) -> Self {
        let first_gen = points.first().map_or(1, |p| p.generation);
        let last_gen = points.last().map_or(1, |p| p.generation);

        let (mut lo, mut hi) = points
            .iter()
            .map(|p| p.fitness)
            .filter(|f| f.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), f| {
                (lo.min(f), hi.max(f))
            });
        if lo > hi {
            (lo, hi) = (0.0, 1.0);
        } else if (hi - lo).abs() < f64::EPSILON {
            // Flat series: center it.
            let pad = lo.abs().max(1.0) * 0.5;
            lo -= pad;
            hi += pad;
        }

        let gen_span = (last_gen - first_gen).max(1) as f64;
        let polyline = points
            .iter()
            .map(|p| {
                let tx = (p.generation - first_gen) as f64 / gen_span;
                let ty = (p.fitness - lo) / (hi - lo);
                (plot.x + tx * plot.w, plot.y + plot.h - ty * plot.h)
            })
            .collect();

        Self {
            plot,
            generations: (first_gen, last_gen),
            fitness_range: (lo, hi),
            polyline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLOT: LayoutRect = LayoutRect {
        x: 60.0,
        y: 40.0,
        w: 800.0,
        h: 500.0,
    };

    #[test]
    fn generations_are_one_indexed() {
        let points = convergence_points(&[10.0, 12.5, 12.5]);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].generation, 1);
        assert_eq!(points[2].generation, 3);
        assert_eq!(points[1].fitness, 12.5);
    }

    #[test]
    fn spans_plot_corners() {
        let chart = ChartGeometry::fit(&convergence_points(&[100.0, 150.0, 200.0]), PLOT);
        assert_eq!(chart.polyline[0], (60.0, 540.0));
        assert_eq!(chart.polyline[1], (460.0, 290.0));
        assert_eq!(chart.polyline[2], (860.0, 40.0));
        assert_eq!(chart.generations, (1, 3));
    }

    #[test]
    fn flat_series_sits_mid_plot() {
        let chart = ChartGeometry::fit(&convergence_points(&[4.0, 4.0]), PLOT);
        assert_eq!(chart.polyline[0].1, 290.0);
        assert_eq!(chart.fitness_range, (2.0, 6.0));
    }

    #[test]
    fn empty_history_has_no_line() {
        let chart = ChartGeometry::fit(&[], PLOT);
        assert!(chart.polyline.is_empty());
        assert_eq!(chart.fitness_range, (0.0, 1.0));
    }
}
