//! Greedy per-class non-maximum suppression.

use log::debug;

use crate::detection::selector::Detection;

/// Suppress overlapping detections independently for each class.
///
/// For every class index in `0..class_count` the highest-scoring remaining
/// detection is kept and every other detection of that class whose IoU with
/// it is `>= iou_threshold` is dropped, until no candidates remain. Boxes of
/// different classes never suppress each other. The result is ordered by
/// class index, then by descending score. Equal scores keep their input order.
pub fn non_max_suppression(
    detections: &[Detection],
    class_count: usize,
    iou_threshold: f32,
    queue_capacity: usize,
) -> Vec<Detection> {
    let mut kept = Vec::with_capacity(detections.len());

    for class_index in 0..class_count {
        let mut queue: Vec<Detection> = Vec::with_capacity(queue_capacity);
        queue.extend(
            detections
                .iter()
                .filter(|d| d.class_index == class_index)
                .copied(),
        );
        queue.sort_by(|a, b| b.score.total_cmp(&a.score));

        while !queue.is_empty() {
            let best = queue.remove(0);
            queue.retain(|d| best.bbox.iou(&d.bbox) < iou_threshold);
            kept.push(best);
        }
    }

    debug!("nms kept {} of {} detections", kept.len(), detections.len());
    kept
}
