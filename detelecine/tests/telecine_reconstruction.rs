//! End-to-end reconstruction of film frames from telecined field streams.
//!
//! Progressive "film" frames are spread over fields following a cadence, the
//! fields are paired into video frames, and the filter must hand back the
//! original film frames byte for byte.

use detelecine::{create_detelecine, Detelecine, DetelecineConfig, FieldOrder};
use detelecine_core::{Frame, PixelFormat, Rational, TimeBase, Timestamp};

const WIDTH: u32 = 16;
const HEIGHT: u32 = 10;
const FORMAT: PixelFormat = PixelFormat::Yuv420p;

/// Per-plane fill value of film frame `k`.
fn film_value(k: usize, plane: usize) -> u8 {
    (k * 4 + plane + 1) as u8
}

/// Build a video frame whose earlier field shows film frame `earlier` and
/// whose later field shows film frame `later`.
fn video_frame(earlier: usize, later: usize, order: FieldOrder, pts: i64) -> Frame {
    let tb = TimeBase::new(1001, 30000);
    let mut frame = Frame::new(WIDTH, HEIGHT, FORMAT, tb);
    frame.pts = Timestamp::new(pts, tb);
    for plane in 0..FORMAT.num_planes() {
        let stride = frame.stride(plane);
        let rows = FORMAT.plane_height(plane, HEIGHT);
        let data = frame.plane_mut(plane).unwrap();
        for y in 0..rows {
            let film = if y % 2 == order.first_row() {
                earlier
            } else {
                later
            };
            data[y * stride..(y + 1) * stride].fill(film_value(film, plane));
        }
    }
    frame
}

/// Telecine `film_frames` frames with `pattern`, drop the first
/// `2 * start_frame` fields and pair the rest into video frames.
fn telecine(pattern: &str, film_frames: usize, start_frame: usize, order: FieldOrder) -> Vec<Frame> {
    let counts: Vec<usize> = pattern.bytes().map(|b| (b - b'0') as usize).collect();
    let fields: Vec<usize> = (0..film_frames)
        .flat_map(|k| std::iter::repeat(k).take(counts[k % counts.len()]))
        .skip(2 * start_frame)
        .collect();
    fields
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| video_frame(pair[0], pair[1], order, i as i64))
        .collect()
}

fn filter(pattern: &str, start_frame: usize, order: FieldOrder) -> Detelecine {
    create_detelecine(
        DetelecineConfig::new(pattern)
            .with_first_field(order)
            .with_start_frame(start_frame),
        WIDTH,
        HEIGHT,
        FORMAT,
        Rational::new(30000, 1001),
        TimeBase::new(1001, 30000),
    )
    .unwrap()
}

/// The film frame `frame` shows if every row of every plane agrees.
fn identify(frame: &Frame) -> Option<usize> {
    let mut found = None;
    for plane in 0..FORMAT.num_planes() {
        let stride = frame.stride(plane);
        let width = FORMAT.row_bytes(plane, WIDTH);
        let data = frame.plane(plane).unwrap();
        for y in 0..FORMAT.plane_height(plane, HEIGHT) {
            let row = &data[y * stride..y * stride + width];
            if row.iter().any(|&b| b != row[0]) {
                return None;
            }
            let value = row[0] as usize;
            if value < plane + 1 || (value - plane - 1) % 4 != 0 {
                return None;
            }
            let k = (value - plane - 1) / 4;
            match found {
                None => found = Some(k),
                Some(prev) if prev != k => return None,
                _ => {}
            }
        }
    }
    found
}

fn run(filter: &mut Detelecine, input: Vec<Frame>) -> Vec<Option<usize>> {
    input
        .into_iter()
        .flat_map(|frame| filter.process(frame).unwrap())
        .map(|frame| identify(&frame))
        .collect()
}

#[test]
fn test_32_pulldown_first_cycle() {
    let mut f = filter("23", 0, FieldOrder::TopFieldFirst);
    let input = telecine("23", 4, 0, FieldOrder::TopFieldFirst);
    assert_eq!(input.len(), 5);

    let counts: Vec<usize> = input
        .into_iter()
        .map(|frame| f.process(frame).unwrap().len())
        .collect();
    assert_eq!(counts, vec![1, 1, 0, 1, 1]);
}

#[test]
fn test_conventional_cadences_restore_film() {
    for pattern in ["23", "32", "2332", "2", "3", "33"] {
        for order in [FieldOrder::TopFieldFirst, FieldOrder::BottomFieldFirst] {
            let mut f = filter(pattern, 0, order);
            let recovered = run(&mut f, telecine(pattern, 40, 0, order));
            let expected: Vec<Option<usize>> = (0..recovered.len()).map(Some).collect();
            assert_eq!(recovered, expected, "pattern {} {:?}", pattern, order);
            assert!(recovered.len() >= 38, "pattern {}: {}", pattern, recovered.len());
        }
    }
}

#[test]
fn test_wrong_field_order_mixes_fields() {
    let mut f = filter("23", 0, FieldOrder::BottomFieldFirst);
    let recovered = run(&mut f, telecine("23", 8, 0, FieldOrder::TopFieldFirst));
    assert!(recovered.iter().any(Option::is_none));
}

#[test]
fn test_cut_stream_on_frame_boundary() {
    // Cut after film frame 0: the stream starts with the three-field frame.
    let mut f = filter("23", 1, FieldOrder::TopFieldFirst);
    let recovered = run(&mut f, telecine("23", 20, 1, FieldOrder::TopFieldFirst));
    let expected: Vec<Option<usize>> = (1..=recovered.len()).map(Some).collect();
    assert_eq!(recovered, expected);
}

#[test]
fn test_cut_stream_with_stray_field() {
    // "3232" cut after one video frame: one field of film frame 0 is left.
    let mut f = filter("3232", 1, FieldOrder::TopFieldFirst);
    let recovered = run(&mut f, telecine("3232", 20, 1, FieldOrder::TopFieldFirst));

    // The stray field is emitted together with its neighbour as-is.
    assert_eq!(recovered[0], None);
    let expected: Vec<Option<usize>> = (1..recovered.len()).map(Some).collect();
    assert_eq!(&recovered[1..], &expected[..]);
}

#[test]
fn test_output_timestamps_follow_film_rate() {
    let mut f = filter("23", 0, FieldOrder::TopFieldFirst);
    let timing = *f.timing().unwrap();
    assert_eq!(timing.frame_rate, Rational::new(24000, 1001));
    assert_eq!(timing.ts_unit, Rational::one());

    let mut input = telecine("23", 12, 0, FieldOrder::TopFieldFirst);
    for (i, frame) in input.iter_mut().enumerate() {
        frame.pts = Timestamp::new(500 + i as i64, TimeBase::new(1001, 30000));
    }

    let pts: Vec<i64> = input
        .into_iter()
        .flat_map(|frame| f.process(frame).unwrap())
        .map(|frame| frame.pts.value)
        .collect();
    let expected: Vec<i64> = (0..pts.len() as i64).map(|n| 500 + n).collect();
    assert_eq!(pts, expected);
}
