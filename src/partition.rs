//! Balanced device partitioner: greedy longest-processing-time scheduler
//! that assigns whole devices to exactly `N` chunks, never splitting one,
//! minimizing the maximum per-chunk row count.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::device_index::DeviceIndex;

/// An owned, LF-terminated chunk of lines assigned to one worker, plus a
/// borrowed reference to the header bytes it travels with over IPC.
pub struct Chunk<'a> {
    pub worker_id: usize,
    pub header: &'a [u8],
    pub bytes: Vec<u8>,
    pub line_count: usize,
}

/// Partition `index` into exactly `n` chunks using longest-processing-time
/// greedy bin-packing over whole devices.
///
/// Devices are sorted by line count descending (ties broken by device-id
/// lexicographic order for determinism), then each is appended to the
/// currently-smallest bucket (ties to the lowest-indexed bucket). Every
/// chunk is emitted even if empty, so the caller always gets exactly `n`
/// chunks one-to-one with its worker pool.
pub fn partition_devices<'a>(
    bytes: &'a [u8],
    index: &DeviceIndex,
    n: usize,
    header: &'a [u8],
) -> Vec<Chunk<'a>> {
    let n = n.max(1);

    let mut devices: Vec<_> = index.iter().collect();
    devices.sort_by(|(a_id, a_refs), (b_id, b_refs)| {
        b_refs
            .len()
            .cmp(&a_refs.len())
            .then_with(|| a_id.as_bytes().cmp(b_id.as_bytes()))
    });

    let mut bucket_devices: Vec<Vec<&Vec<crate::line_scan::LineRef>>> = vec![Vec::new(); n];
    let mut heap: BinaryHeap<Reverse<(usize, usize)>> =
        (0..n).map(|i| Reverse((0usize, i))).collect();

    for (_device_id, refs) in &devices {
        let Reverse((total, bucket_idx)) = heap.pop().expect("n buckets were seeded above");
        bucket_devices[bucket_idx].push(refs);
        heap.push(Reverse((total + refs.len(), bucket_idx)));
    }

    bucket_devices
        .into_iter()
        .enumerate()
        .map(|(worker_id, assigned)| materialize_chunk(bytes, worker_id, header, assigned))
        .collect()
}

fn materialize_chunk<'a>(
    bytes: &'a [u8],
    worker_id: usize,
    header: &'a [u8],
    assigned: Vec<&Vec<crate::line_scan::LineRef>>,
) -> Chunk<'a> {
    let mut out = Vec::new();
    let mut line_count = 0usize;
    for refs in assigned {
        for line in refs {
            out.extend_from_slice(&bytes[line.start..line.end]);
            out.push(b'\n');
            line_count += 1;
        }
    }
    Chunk {
        worker_id,
        header,
        bytes: out,
        line_count,
    }
}
