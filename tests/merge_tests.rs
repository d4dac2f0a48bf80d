use mihomo_linkconv::template::merge_template_with_proxies;

const BLOCK: &str = "proxies:\n- name: 'new'\n  type: trojan";

#[test]
fn test_only_proxies_span_is_replaced() {
    let template = "\
mixed-port: 7890
mode: rule

proxies:
  - name: old-1
  - name: old-2

proxy-groups:
  - name: Auto
    type: url-test

rules:
  - MATCH,Auto
";
    let merged = merge_template_with_proxies(template, BLOCK);
    assert_eq!(
        merged,
        "mixed-port: 7890\nmode: rule\n\nproxies:\n- name: 'new'\n  type: trojan\n\nproxy-groups:\n  - name: Auto\n    type: url-test\n\nrules:\n  - MATCH,Auto\n"
    );
    let tail = &template[template.find("proxy-groups:").unwrap()..];
    assert!(merged.ends_with(tail));
}

#[test]
fn test_insert_before_proxy_groups() {
    let merged = merge_template_with_proxies("proxy-groups:\n  - name: Auto", BLOCK);
    let block_at = merged.find("proxies:").unwrap();
    let groups_at = merged.find("proxy-groups:").unwrap();
    assert!(block_at < groups_at);
    assert_eq!(&merged[groups_at - 2..groups_at], "\n\n");
    assert!(merged.ends_with("proxy-groups:\n  - name: Auto\n"));
}

#[test]
fn test_insert_before_later_marker() {
    let merged = merge_template_with_proxies("mode: rule\ndns:\n  enable: true\n", BLOCK);
    assert_eq!(
        merged,
        "mode: rule\n\nproxies:\n- name: 'new'\n  type: trojan\n\ndns:\n  enable: true\n"
    );
}

#[test]
fn test_append_with_one_blank_line() {
    let merged = merge_template_with_proxies("mixed-port: 7890\nallow-lan: false\n\n", BLOCK);
    assert_eq!(
        merged,
        "mixed-port: 7890\nallow-lan: false\n\nproxies:\n- name: 'new'\n  type: trojan\n"
    );
}

#[test]
fn test_non_yaml_host_still_merges() {
    let merged = merge_template_with_proxies("{{ broken\nrules:\n- x", BLOCK);
    assert_eq!(
        merged,
        "{{ broken\n\nproxies:\n- name: 'new'\n  type: trojan\n\nrules:\n- x\n"
    );
}

#[test]
fn test_merge_is_stable_when_repeated() {
    let template = "proxies: []\nproxy-groups:\n  - name: Auto\n";
    let once = merge_template_with_proxies(template, BLOCK);
    let twice = merge_template_with_proxies(&once, BLOCK);
    assert_eq!(once, twice);
}

#[test]
fn test_trailing_blank_lines_collapse_to_one_newline() {
    let merged = merge_template_with_proxies("mode: rule\nrules:\n- x\n\n\n", BLOCK);
    assert_eq!(
        merged,
        "mode: rule\n\nproxies:\n- name: 'new'\n  type: trojan\n\nrules:\n- x\n"
    );

    let appended = merge_template_with_proxies("mode: rule\n", "proxies:\n- name: 'n'\n\n\n");
    assert!(appended.ends_with("- name: 'n'\n"));
    assert!(!appended.ends_with("\n\n"));
}
