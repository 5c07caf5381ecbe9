//! Recognition integration tests.

mod common;

use std::sync::Arc;

use placematch::ingest::{ClassTree, IngestionPipeline};
use placematch::{Descriptor, DistanceMetric, Error, ErrorKind, RecognizeRequest, Recognizer};

use common::{file_extractor, image_tree, registry};

#[test]
fn test_recognize_and_vote() {
    let (_dir, registry) = registry();
    for (label, v) in [("A", 0.0), ("A", 3.0), ("B", 1.0), ("C", 4.0), ("A", 5.0)] {
        registry.append("street", label, &Descriptor::new(vec![v, 0.0]).unwrap()).unwrap();
    }

    let recognizer = Recognizer::new(Arc::clone(&registry), DistanceMetric::Euclidean).with_top_n(3);
    let request = RecognizeRequest::new("street", vec![0.0, 0.0]);

    let single = recognizer.recognize(&request).unwrap();
    assert_eq!(single.best_match_class, "A");
    assert_eq!(single.metric_value, 0.0);

    let vote = recognizer.vote(&request).unwrap();
    assert_eq!(vote.best_match_class, "A");
    let ranked: Vec<_> = vote.ranked_top_n.iter().map(|r| r.class_label.as_str()).collect();
    assert_eq!(ranked, vec!["A", "B", "A"]);

    let one = recognizer.recognize_top_n(&request, 1).unwrap();
    assert_eq!(one.best_match_class, single.best_match_class);
}

#[test]
fn test_metric_override_per_request() {
    let (_dir, registry) = registry();
    registry.append("d", "aligned", &Descriptor::new(vec![1.0, 0.0]).unwrap()).unwrap();
    registry.append("d", "offset", &Descriptor::new(vec![9.0, 3.0]).unwrap()).unwrap();

    let recognizer = Recognizer::new(Arc::clone(&registry), DistanceMetric::Euclidean);
    let request = RecognizeRequest::new("d", vec![10.0, 0.0]);
    assert_eq!(recognizer.recognize(&request).unwrap().best_match_class, "offset");

    let request = request.with_metric(DistanceMetric::Cosine);
    assert_eq!(recognizer.recognize(&request).unwrap().best_match_class, "aligned");
}

#[test]
fn test_empty_and_missing_datasets() {
    let (dir, registry) = registry();
    let recognizer = Recognizer::new(Arc::clone(&registry), DistanceMetric::Euclidean);
    let request = RecognizeRequest::new("nowhere", vec![1.0]);

    assert!(matches!(recognizer.recognize(&request), Err(Error::NoMatch)));
    assert!(matches!(recognizer.vote(&request), Err(Error::EmptyStore)));
    assert!(!dir.path().join("stores").join("nowhere.redb").exists());

    registry.open("empty").unwrap();
    let request = RecognizeRequest::new("empty", vec![1.0]);
    assert!(matches!(recognizer.recognize(&request), Err(Error::NoMatch)));
    let err = recognizer.vote(&request).unwrap_err();
    assert!(matches!(err, Error::EmptyStore));
    assert_eq!(err.kind(), ErrorKind::CallerInput);
}

#[test]
fn test_caller_input_errors() {
    let (_dir, registry) = registry();
    registry.append("d", "a", &Descriptor::new(vec![1.0, 2.0]).unwrap()).unwrap();
    let recognizer = Recognizer::new(Arc::clone(&registry), DistanceMetric::Euclidean);

    let request = RecognizeRequest::new("d", vec![1.0, 2.0]);
    assert!(matches!(recognizer.recognize_top_n(&request, 0), Err(Error::InvalidArgument(_))));

    let request = RecognizeRequest::new("d", vec![1.0]);
    let err = recognizer.recognize(&request).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 1 }));

    let request = RecognizeRequest::new("../etc", vec![1.0, 2.0]);
    assert!(matches!(recognizer.recognize(&request), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_non_finite_query_rejected() {
    let (_dir, registry) = registry();
    registry.append("d", "far", &Descriptor::new(vec![100.0, 0.0]).unwrap()).unwrap();
    registry.append("d", "near", &Descriptor::new(vec![0.0, 0.0]).unwrap()).unwrap();
    let recognizer = Recognizer::new(Arc::clone(&registry), DistanceMetric::Euclidean);

    for query in [vec![f32::NAN, 0.0], vec![f32::INFINITY, 0.0]] {
        let request = RecognizeRequest::new("d", query);

        let err = recognizer.recognize(&request).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::CallerInput);

        let err = recognizer.recognize_top_n(&request, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{err:?}");
    }

    // Checked before the dataset is looked up
    let request = RecognizeRequest::new("ghost", vec![f32::NAN]);
    assert!(matches!(recognizer.recognize(&request), Err(Error::InvalidArgument(_))));
    assert!(matches!(recognizer.vote(&request), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_recognize_image() {
    let (dir, registry) = registry();
    let root = image_tree(
        &dir.path().join("images"),
        &[("lobby", "1.png", &[1.0, 0.0, 0.0]), ("roof", "1.png", &[0.0, 0.0, 1.0])],
    );
    IngestionPipeline::new(Arc::clone(&registry), file_extractor())
        .describe_dataset("tower", &ClassTree::from_dir(&root).unwrap())
        .unwrap();

    let query = image_tree(&dir.path().join("queries"), &[("q", "1.png", &[0.1, 0.0, 0.9])]);
    let image = query.join("q").join("1.png");

    let without = Recognizer::new(Arc::clone(&registry), DistanceMetric::Cosine);
    assert!(matches!(without.recognize_image("tower", &image), Err(Error::Config(_))));

    let recognizer = without.with_extractor(file_extractor());
    assert_eq!(recognizer.recognize_image("tower", &image).unwrap().best_match_class, "roof");
    assert_eq!(recognizer.vote_image("tower", &image).unwrap().best_match_class, "roof");
}
