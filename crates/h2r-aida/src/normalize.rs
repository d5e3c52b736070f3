//! Density normalization of a finished store.

use tracing::{info, warn};

use h2r_store::{Histogram, Store};

use crate::error::Result;

/// Name of the root-level histogram recording the event count.
pub const EVENT_COUNT_NAME: &str = "N";

/// Rescale every histogram to a per-event, per-unit-x density and record
/// the denominator.
///
/// Each ordinary bin becomes `content * width / event_count`; flow cells are
/// zeroed and bin errors dropped. A one-bin histogram `N` over `[0, 1)`
/// holding `event_count` is then placed at the root.
pub fn normalize(store: &mut Store, event_count: f64) -> Result<()> {
    if event_count == 0.0 {
        warn!("event count is zero, normalized contents will not be finite");
    }
    let mut rescaled = 0usize;
    store.root_mut().walk_histograms_mut(&mut |h| {
        h.rescale_with_widths(|content, width| content * width / event_count);
        h.reset_errors();
        rescaled += 1;
    });
    info!("normalized {rescaled} histograms to {event_count} events");

    let mut n = Histogram::with_edges(EVENT_COUNT_NAME, EVENT_COUNT_NAME, vec![0.0, 1.0])?;
    n.fill(0.5, event_count);
    store.root_mut().insert_histogram(n)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{HistogramRecord, insert_record};
    use approx::assert_relative_eq;

    fn store_with(path: &str, edges: Vec<f64>, values: Vec<f64>) -> Store {
        let mut store = Store::new();
        let errors = Some(vec![1.0; values.len()]);
        let record =
            HistogramRecord { path: path.into(), title: String::new(), edges, values, errors };
        insert_record(&mut store, &record).unwrap();
        store
    }

    #[test]
    fn single_bin_density() {
        let mut store = store_with("/a/h", vec![1.0, 3.5], vec![10.0]);
        normalize(&mut store, 4.0).unwrap();
        let h = store.histogram("a/h").unwrap();
        assert_relative_eq!(h.contents()[0], 10.0 * 2.5 / 4.0, max_relative = 1e-12);
        assert_eq!(h.underflow(), 0.0);
        assert_eq!(h.overflow(), 0.0);
        assert!(h.sumw2().is_none());
    }

    #[test]
    fn unit_event_count_multiplies_by_width() {
        let mut store = store_with("h", vec![0.0, 0.5, 2.0], vec![3.0, 4.0]);
        normalize(&mut store, 1.0).unwrap();
        let h = store.histogram("h").unwrap();
        assert_relative_eq!(h.contents()[0], 1.5);
        assert_relative_eq!(h.contents()[1], 6.0);
    }

    #[test]
    fn flows_are_forced_to_zero() {
        let mut store = store_with("h", vec![0.0, 1.0], vec![2.0]);
        store.root_mut().walk_histograms_mut(&mut |h| {
            h.fill(-5.0, 1.0);
            h.fill(5.0, 1.0);
        });
        normalize(&mut store, 2.0).unwrap();
        let h = store.histogram("h").unwrap();
        assert_eq!(h.cells(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn records_event_count_at_root() {
        let mut store = store_with("/deep/er/h", vec![0.0, 1.0], vec![1.0]);
        normalize(&mut store, 1234.0).unwrap();
        let n = store.histogram("N").unwrap();
        assert_eq!(n.n_bins(), 1);
        assert_eq!(n.bin_edges(), &[0.0, 1.0]);
        assert_eq!(n.contents(), &[1234.0]);
        assert_eq!(store.histogram_count(), 2);
    }

    #[test]
    fn existing_n_is_replaced() {
        let mut store = store_with("N", vec![0.0, 5.0], vec![7.0]);
        normalize(&mut store, 3.0).unwrap();
        assert_eq!(store.histogram_count(), 1);
        assert_eq!(store.histogram("N").unwrap().contents(), &[3.0]);
    }
}
