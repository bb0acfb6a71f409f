//! 시그니처 매칭 벤치마크
//!
//! 부분 문자열/정규식/그룹 규칙 매칭과 규칙 수에 따른 스케일링을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kinix_forensic::signature::{
    Combinator, Haystack, Pattern, RuleMatcher, SignatureEngine, SignatureRule,
};

const LOG_LINE: &str =
    "Jan 15 12:00:00 web-01 sshd[1234]: Failed password for root from 192.168.1.100 port 22";

fn create_regex_rule(id: &str, pattern: &str) -> SignatureRule {
    let mut rule = SignatureRule::any_substring(id, &format!("Regex Rule {id}"), &["x"]);
    rule.patterns = vec![Pattern::regex("p", pattern)];
    rule
}

fn create_groups_rule(id: &str) -> SignatureRule {
    let mut rule = SignatureRule::any_substring(id, &format!("Groups Rule {id}"), &["x"]);
    rule.patterns = vec![
        Pattern::substring("a", "failed"),
        Pattern::substring("b", "password"),
        Pattern::regex("c", r"\d+\.\d+\.\d+\.\d+"),
    ];
    rule.combinator = Combinator::Groups(vec![
        vec!["a".to_owned(), "b".to_owned()],
        vec!["a".to_owned(), "c".to_owned()],
    ]);
    rule
}

fn bench_substring_rule(c: &mut Criterion) {
    let rule = SignatureRule::any_substring("bf", "Brute Force", &["failed password"]);
    let mut matcher = RuleMatcher::new();
    matcher.compile_rule(&rule).unwrap();
    let haystack = Haystack::new(LOG_LINE);

    let mut group = c.benchmark_group("substring_rule");
    group.throughput(Throughput::Elements(1));
    group.bench_function("any_match", |b| {
        b.iter(|| matcher.matches(black_box(&rule), black_box(&haystack)))
    });
    group.finish();
}

fn bench_regex_rule(c: &mut Criterion) {
    let rule = create_regex_rule("re-1", r"failed.*password.*from.*\d+\.\d+\.\d+\.\d+");
    let mut matcher = RuleMatcher::new();
    matcher.compile_rule(&rule).unwrap();
    let haystack = Haystack::new(LOG_LINE);

    let mut group = c.benchmark_group("regex_rule");
    group.throughput(Throughput::Elements(1));
    group.bench_function("regex_match", |b| {
        b.iter(|| matcher.matches(black_box(&rule), black_box(&haystack)))
    });
    group.finish();
}

fn bench_groups_rule(c: &mut Criterion) {
    let rule = create_groups_rule("groups-1");
    let mut matcher = RuleMatcher::new();
    matcher.compile_rule(&rule).unwrap();
    let haystack = Haystack::new(LOG_LINE);

    let mut group = c.benchmark_group("groups_rule");
    group.throughput(Throughput::Elements(1));
    group.bench_function("or_of_and", |b| {
        b.iter(|| matcher.matches(black_box(&rule), black_box(&haystack)))
    });
    group.finish();
}

fn bench_rules_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules_scaling");

    for rule_count in [5, 50, 500] {
        let rules: Vec<SignatureRule> = (0..rule_count)
            .map(|i| match i % 3 {
                0 => SignatureRule::any_substring(
                    &format!("rule-{i}"),
                    &format!("Rule {i}"),
                    &["failed password", "kernel panic"],
                ),
                1 => create_regex_rule(&format!("rule-{i}"), r"failed.*password"),
                _ => create_groups_rule(&format!("rule-{i}")),
            })
            .collect();
        let engine = SignatureEngine::new(rules).unwrap();

        group.throughput(Throughput::Elements(rule_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(rule_count),
            &engine,
            |b, engine| b.iter(|| engine.evaluate(black_box(LOG_LINE))),
        );
    }

    group.finish();
}

fn bench_default_rules(c: &mut Criterion) {
    let engine = SignatureEngine::with_defaults();
    let clean = "GET /index.html HTTP/1.1 200 OK ".repeat(64);
    let dirty = format!("{clean} union select password from users");

    let mut group = c.benchmark_group("default_rules");
    group.throughput(Throughput::Bytes(clean.len() as u64));
    group.bench_function("clean_2k", |b| {
        b.iter(|| engine.evaluate(black_box(&clean)))
    });
    group.bench_function("dirty_2k", |b| {
        b.iter(|| engine.evaluate(black_box(&dirty)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_substring_rule,
    bench_regex_rule,
    bench_groups_rule,
    bench_rules_scaling,
    bench_default_rules,
);
criterion_main!(benches);
