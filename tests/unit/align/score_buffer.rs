//! Unit tests for align/score_buffer.rs

use banded_swipe::align::ScoreBuffer;

#[test]
fn test_columns_grow_storage() {
    let mut buf: ScoreBuffer<i32> = ScoreBuffer::new();
    buf.init(5, 4, 0);
    assert_eq!(buf.len(), 5);
    for n in 1..=7 {
        let (prev, cur) = buf.append_column();
        assert_eq!(prev.len(), 5);
        assert_eq!(cur.len(), 5);
        assert_eq!(buf.len(), 5 * (n + 1));
        assert_eq!(buf.columns(), n + 1);
    }
}

#[test]
fn test_previous_column_is_last_written() {
    let mut buf: ScoreBuffer<i32> = ScoreBuffer::new();
    buf.init(3, 3, -1);
    {
        let (prev, cur) = buf.append_column();
        assert_eq!(prev, &[-1, -1, -1]);
        cur.copy_from_slice(&[1, 2, 3]);
    }
    let (prev, cur) = buf.append_column();
    assert_eq!(prev, &[1, 2, 3]);
    assert_eq!(cur, &[0, 0, 0]);
}

#[test]
fn test_find_value_column_major() {
    let mut buf: ScoreBuffer<i32> = ScoreBuffer::new();
    buf.init(3, 3, 0);
    {
        let (_, cur) = buf.append_column();
        cur[2] = 9;
    }
    {
        let (_, cur) = buf.append_column();
        cur[0] = 9;
    }
    // (row 2, col 1) precedes (row 0, col 2) in storage order
    assert_eq!(buf.find_value(9), Some((2, 1)));
    assert_eq!(buf.at(0, 2), 9);
    assert_eq!(buf.find_value(42), None);
}

#[test]
fn test_init_resets() {
    let mut buf: ScoreBuffer<i32> = ScoreBuffer::new();
    buf.init(4, 2, 0);
    buf.append_column();
    buf.append_column();
    buf.init(2, 2, 7);
    assert_eq!(buf.len(), 2);
    assert_eq!(buf.column(0), &[7, 7]);
}
