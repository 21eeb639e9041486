use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use markup::html::{div, h2, table, td, tr};
use markup::{HtmlBuilder, Node, encode_text, escape_str, to_plain_text_str, unescape_str};

const SMALL_ROWS: usize = 16;
const LARGE_ROWS: usize = 5_000;

fn make_document(rows: usize) -> String {
    let mut out = String::with_capacity(rows * 96 + 128);
    out.push_str("<html><head><title>bench</title><style>td { padding: 2px }</style></head><body>");
    out.push_str("<table>");
    for i in 0..rows {
        out.push_str("<tr><td>row ");
        out.push_str(&i.to_string());
        out.push_str("</td><td>Tom &amp; Jerry&nbsp;&nbsp;<b>bold</b><br/></td></tr>\n");
    }
    out.push_str("</table><!-- trailing comment --></body></html>");
    out
}

fn make_text(bytes: usize) -> String {
    let mut out = String::with_capacity(bytes + 32);
    while out.len() < bytes {
        out.push_str("a < b & \"c\"\tline/one\n   indented\r\n");
    }
    out
}

fn make_layout(rows: usize) -> Node {
    let rows: Vec<Node> = (0..rows)
        .map(|i| tr(vec![Node::from(td(format!("A{i}"))), td("B & C").into()]).into())
        .collect();
    div(vec![Node::from(h2("report")), table(rows).into()]).into_node()
}

fn bench_plain_text_small(c: &mut Criterion) {
    let input = make_document(SMALL_ROWS);
    c.bench_function("bench_plain_text_small", |b| {
        b.iter(|| black_box(to_plain_text_str(black_box(&input))).len());
    });
}

fn bench_plain_text_large(c: &mut Criterion) {
    let input = make_document(LARGE_ROWS);
    c.bench_function("bench_plain_text_large", |b| {
        b.iter(|| black_box(to_plain_text_str(black_box(&input))).len());
    });
}

fn bench_plain_text_angle_brackets(c: &mut Criterion) {
    let input = "<a ".repeat(20_000);
    c.bench_function("bench_plain_text_angle_brackets", |b| {
        b.iter(|| black_box(to_plain_text_str(black_box(&input))).len());
    });
}

fn bench_escape_roundtrip(c: &mut Criterion) {
    let input = make_text(64 * 1024);
    c.bench_function("bench_escape_roundtrip", |b| {
        b.iter(|| {
            let escaped = escape_str(black_box(&input));
            black_box(unescape_str(&escaped).len());
        });
    });
}

fn bench_encode_text(c: &mut Criterion) {
    let input = make_text(64 * 1024);
    c.bench_function("bench_encode_text", |b| {
        b.iter(|| black_box(encode_text(black_box(&input))).len());
    });
}

fn bench_render_layout(c: &mut Criterion) {
    let layout = make_layout(LARGE_ROWS);
    c.bench_function("bench_render_layout", |b| {
        b.iter(|| black_box(layout.to_html()).len());
    });
}

fn bench_builder_cached_reads(c: &mut Criterion) {
    c.bench_function("bench_builder_cached_reads", |b| {
        b.iter_batched(
            || div(make_layout(SMALL_ROWS)),
            |builder| {
                for _ in 0..8 {
                    black_box(builder.to_html().len());
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_plain_text_small,
    bench_plain_text_large,
    bench_plain_text_angle_brackets,
    bench_escape_roundtrip,
    bench_encode_text,
    bench_render_layout,
    bench_builder_cached_reads
);
criterion_main!(benches);
