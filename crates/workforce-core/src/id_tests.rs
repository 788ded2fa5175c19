use super::*;

#[test]
fn task_id_roundtrips_through_string_conversions() {
    let id = TaskId::new("t1");
    assert_eq!(id.as_str(), "t1");
    assert_eq!(id, "t1");
    let from_string: TaskId = String::from("t2").into();
    assert_eq!(from_string.as_str(), "t2");
}

#[test]
fn short_truncates_and_is_noop_when_shorter_than_n() {
    let id = TaskId::new("abcdefgh");
    assert_eq!(id.short(4), "abcd");
    assert_eq!(id.short(100), "abcdefgh");
}

#[test]
fn sequential_id_gen_is_monotonic_and_prefixed() {
    let gen = SequentialIdGen::new("w");
    let a = gen.next();
    let b = gen.next();
    assert_eq!(a, "w-1");
    assert_eq!(b, "w-2");
}

#[test]
fn uuid_id_gen_produces_unique_values() {
    let gen = UuidIdGen;
    assert_ne!(gen.next(), gen.next());
}
