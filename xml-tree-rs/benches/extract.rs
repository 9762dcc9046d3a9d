use criterion::{criterion_group, criterion_main, Criterion};
use xml_tree_rs::{ElementGraph, XmlTree};

pub fn criterion_benchmark(c: &mut Criterion) {
    let xml = include_str!("../test/article.xml");
    c.bench_function("extract article.xml", |b| b.iter(|| XmlTree::parse(xml)));

    let tree = XmlTree::parse(xml).expect("can not parse article.xml");
    c.bench_function("prune article.xml", |b| b.iter(|| ElementGraph::construct(&tree, 3)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
