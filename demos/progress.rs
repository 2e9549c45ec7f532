use std::time::Duration;

use upscaler::progress::ProgressBarBuilder;

fn main() -> upscaler::Result<()> {
    let items: Vec<u64> = (2000..3000).map(|x| x * 5).collect();
    let mut bar = ProgressBarBuilder::new(items.len())
        .width(30)
        .style(4)
        .build()?;
    for (i, n) in items.iter().enumerate() {
        bar.update(i);
        // a little busy work per item
        let digits = (1..=*n).map(|k| (k as f64).log10()).sum::<f64>();
        std::hint::black_box(digits);
        std::thread::sleep(Duration::from_millis(2));
    }
    bar.finish();
    Ok(())
}
