use plotters::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use vorocell::sites::random_sites;
use vorocell::{BoundingBox, VoronoiDiagram};

const RESOLUTION: u32 = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Define the output file and dimensions
    let filename = "slice.svg";
    let root = SVGBackend::new(filename, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let bounds = BoundingBox::new([0.0, 0.0, 0.0], [100.0, 100.0, 100.0])?;
    let mut rng = StdRng::seed_from_u64(2024);
    let sites = random_sites(&mut rng, 40, &bounds);
    let diagram = VoronoiDiagram::new(&sites, bounds.min, bounds.max)?;

    let z = 50.0;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Voronoi cells at z = {}", z), ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;
    chart.configure_mesh().draw()?;

    // Color each sample of the slice by the cell it falls in
    let step = 100.0 / RESOLUTION as f64;
    let mut samples = Vec::with_capacity((RESOLUTION * RESOLUTION) as usize);
    for i in 0..RESOLUTION {
        for j in 0..RESOLUTION {
            let x = (i as f64 + 0.5) * step;
            let y = (j as f64 + 0.5) * step;
            if let Some(cell) = diagram.locate([x, y, z]) {
                samples.push((x, y, cell));
            }
        }
    }
    chart.draw_series(samples.iter().map(|&(x, y, cell)| {
        let color = Palette99::pick(cell).mix(0.6).filled();
        Rectangle::new([(x - step / 2.0, y - step / 2.0), (x + step / 2.0, y + step / 2.0)], color)
    }))?;

    // Draw the sites close to the slice as points
    chart.draw_series(
        sites
            .iter()
            .filter(|s| (s[2] - z).abs() < 10.0)
            .map(|s| Circle::new((s[0], s[1]), 3, BLACK.filled())),
    )?;

    root.present()?;
    println!("Example output saved to {}", filename);
    Ok(())
}
