//! Conformance fixture runner.
//!
//! Each fixture under `tests/fixtures/` is a JSON record describing an
//! initial machine state, a program blob, and the expected final state.
//! Fixtures are the external regression contract: they must replay
//! byte-for-byte, so every field is compared exactly.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use obsidian_pvm::{
    run, ExecutionContext, ExitReason, Memory, PageAccess, Program, Registers,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Fixture {
    initial_pc: u32,
    initial_gas: i64,
    initial_regs: [u64; 13],
    #[serde(default)]
    initial_memory: Vec<MemoryChunk>,
    #[serde(default)]
    initial_page_map: Vec<PageMapEntry>,
    program: Vec<u8>,
    expected_status: String,
    expected_pc: u32,
    expected_regs: [u64; 13],
    #[serde(default)]
    expected_memory: Vec<MemoryChunk>,
    #[serde(default)]
    expected_page_fault_address: Option<u32>,
    #[serde(default)]
    expected_gas: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct MemoryChunk {
    address: u32,
    contents: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PageMapEntry {
    address: u32,
    length: u32,
    is_writable: bool,
}

fn build_context(fixture: &Fixture) -> ExecutionContext {
    let mut memory = Memory::new();
    for entry in &fixture.initial_page_map {
        let access = if entry.is_writable {
            PageAccess::Write
        } else {
            PageAccess::Read
        };
        memory.upsert_acl_range(entry.address, entry.length, access);
    }
    for chunk in &fixture.initial_memory {
        memory.poke(chunk.address, &chunk.contents);
    }
    ExecutionContext::new(fixture.initial_pc, fixture.initial_gas)
        .with_registers(Registers::from(fixture.initial_regs))
        .with_memory(memory)
}

fn check_status(name: &str, fixture: &Fixture, reason: ExitReason) {
    let ok = match (fixture.expected_status.as_str(), reason) {
        ("halt", ExitReason::Halt) => true,
        ("panic", ExitReason::Panic) => true,
        ("out-of-gas", ExitReason::OutOfGas) => true,
        ("page-fault", ExitReason::PageFault { address }) => {
            assert_eq!(
                fixture.expected_page_fault_address,
                Some(address),
                "{name}: page fault address"
            );
            true
        }
        ("host-call", ExitReason::HostCall { .. }) => true,
        _ => false,
    };
    assert!(
        ok,
        "{name}: expected status {:?}, got {:?}",
        fixture.expected_status, reason
    );
}

fn replay(name: &str, fixture: &Fixture) {
    let program = Program::parse(&fixture.program)
        .unwrap_or_else(|e| panic!("{name}: bad program blob: {e}"));
    let mut ctx = build_context(fixture);

    let reason = run(&program, &mut ctx);

    check_status(name, fixture, reason);
    assert_eq!(ctx.pc, fixture.expected_pc, "{name}: final pc");
    assert_eq!(
        ctx.registers.as_slice(),
        &fixture.expected_regs[..],
        "{name}: final registers"
    );
    if let Some(gas) = fixture.expected_gas {
        assert_eq!(ctx.gas, gas, "{name}: remaining gas");
    }
    for chunk in &fixture.expected_memory {
        let actual = ctx.memory.peek(chunk.address, chunk.contents.len() as u32);
        assert_eq!(
            actual,
            chunk.contents,
            "{name}: memory at {:#x} (got {})",
            chunk.address,
            hex::encode(&actual)
        );
    }
}

#[test]
fn conformance_fixtures() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut paths: Vec<_> = fs::read_dir(&dir)
        .expect("fixtures directory")
        .map(|e| e.expect("fixture entry").path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    assert!(!paths.is_empty(), "no fixtures found in {}", dir.display());

    for path in paths {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("fixture")
            .to_owned();
        let raw = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("{name}: read failed: {e}"));
        let fixture: Fixture = serde_json::from_str(&raw)
            .unwrap_or_else(|e| panic!("{name}: parse failed: {e}"));
        replay(&name, &fixture);
    }
}

#[test]
fn fixtures_are_deterministic_under_replay() {
    // Running any fixture twice from identical contexts must agree in
    // every observable.
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    for entry in fs::read_dir(&dir).expect("fixtures directory") {
        let path = entry.expect("fixture entry").path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let raw = fs::read_to_string(&path).expect("fixture read");
        let fixture: Fixture = serde_json::from_str(&raw).expect("fixture parse");
        let program = Program::parse(&fixture.program).expect("program blob");

        let mut first = build_context(&fixture);
        let mut second = build_context(&fixture);
        let ra = run(&program, &mut first);
        let rb = run(&program, &mut second);

        assert_eq!(ra, rb);
        assert_eq!(first.pc, second.pc);
        assert_eq!(first.gas, second.gas);
        assert_eq!(first.registers, second.registers);
    }
}
