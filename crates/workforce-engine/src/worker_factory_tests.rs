use super::*;
use workforce_core::id::SequentialIdGen;

#[test]
fn picks_the_template_with_the_most_overlap() {
    let factory = TemplateWorkerFactory::new(Arc::new(SequentialIdGen::new("worker")));
    let worker = factory.create_worker(&["rust".to_string(), "code_review".to_string()]);
    assert_eq!(worker.role, "coder");
    assert!(worker.has_capability("rust"));
}

#[test]
fn falls_back_to_generalist_when_nothing_overlaps() {
    let factory = TemplateWorkerFactory::new(Arc::new(SequentialIdGen::new("worker")));
    let worker = factory.create_worker(&["telekinesis".to_string()]);
    assert_eq!(worker.role, "generalist");
    assert!(worker.has_capability("telekinesis"));
}

#[test]
fn assigns_a_fresh_id_each_time() {
    let factory = TemplateWorkerFactory::new(Arc::new(SequentialIdGen::new("worker")));
    let a = factory.create_worker(&[]);
    let b = factory.create_worker(&[]);
    assert_ne!(a.id, b.id);
}
