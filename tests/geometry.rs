use croplot::geometry::{plot_constraints, DataPoint, ScreenPoint, Triangle, Viewport};

fn graph() -> Viewport {
    Viewport::new(500, 200, 250, 250)
}

#[test]
fn default_parameters_do_not_cross_in_quadrant() {
    let plot = plot_constraints(14.0, 10.0, &graph());
    assert_eq!(plot.intersection, DataPoint::new(18.0, -4.0));
    assert_eq!(plot.clamped_intersection.y, 0.0);
    assert!((plot.clamped_intersection.x - 16.8).abs() < 1e-9);
    assert_eq!(plot.feasible_region, None);

    assert_eq!(plot.land_line.start, ScreenPoint::new(500, 242));
    assert_eq!(plot.land_line.end, ScreenPoint::new(708, 450));
    assert_eq!(plot.labor_line.start, ScreenPoint::new(500, 376));
    assert_eq!(plot.labor_line.end, ScreenPoint::new(648, 450));
}

#[test]
fn crossing_constraints_produce_triangle() {
    let plot = plot_constraints(10.0, 15.0, &graph());
    assert_eq!(plot.intersection, DataPoint::new(5.0, 5.0));
    assert_eq!(plot.clamped_intersection, DataPoint::new(5.0, 5.0));
    assert_eq!(
        plot.feasible_region,
        Some(Triangle {
            vertices: [
                ScreenPoint::new(500, 450),
                ScreenPoint::new(569, 346),
                ScreenPoint::new(638, 450),
            ]
        })
    );
}

#[test]
fn zero_land_and_labor_is_degenerate() {
    let plot = plot_constraints(0.0, 0.0, &graph());
    assert!(plot.is_degenerate());
    assert_eq!(plot.scale.x, 0.0);
    assert_eq!(plot.scale.y, 0.0);
    assert_eq!(plot.feasible_region, None);
    let corner = ScreenPoint::new(500, 450);
    assert_eq!(plot.land_line.start, corner);
    assert_eq!(plot.land_line.end, corner);
    assert_eq!(plot.labor_line.start, corner);
    assert_eq!(plot.labor_line.end, corner);
}

#[test]
fn labor_only_still_scales() {
    let plot = plot_constraints(0.0, 8.0, &graph());
    assert!(!plot.is_degenerate());
    assert!(plot.scale.x > 0.0 && plot.scale.y > 0.0);
    assert_eq!(plot.feasible_region, None);
}

#[test]
fn geometry_invariants_hold_across_parameter_range() {
    let viewport = graph();
    for land in 0..=30 {
        for labor in 0..=60 {
            let (land, labor) = (f64::from(land), f64::from(labor));
            let plot = plot_constraints(land, labor, &viewport);
            let degenerate = land == 0.0 && labor == 0.0;

            if !degenerate {
                assert!(plot.scale.x.is_finite() && plot.scale.x > 0.0);
                assert!(plot.scale.y.is_finite() && plot.scale.y > 0.0);
            }

            for point in [
                plot.land_line.start,
                plot.land_line.end,
                plot.labor_line.start,
                plot.labor_line.end,
            ] {
                assert!(
                    viewport.contains(point),
                    "land={land} labor={labor}: {point:?} outside viewport"
                );
            }

            let c = plot.clamped_intersection;
            assert!(c.x >= 0.0 && c.x <= plot.bounds.limit_x());
            assert!(c.y >= 0.0 && c.y <= plot.bounds.limit_y());

            let expect_region = land <= labor && labor <= 2.0 * land && !degenerate;
            assert_eq!(
                plot.feasible_region.is_some(),
                expect_region,
                "land={land} labor={labor}"
            );
            if let Some(region) = plot.feasible_region {
                assert!(region.vertices.iter().all(|v| viewport.contains(*v)));
            }
        }
    }
}
