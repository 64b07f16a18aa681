use crate::test::{assemble_clean, assemble_failing};
use mcpu::{
    make_instruction_word, make_register_pair_word, AddressingMode::*, Opcode, Word,
};

fn object_text(code: &[Word], data: &[Word]) -> String {
    let image = obfile::ObjectImage::from(code.to_vec(), data.to_vec());
    let mut buffer = Vec::new();
    obfile::write_object(&mut buffer, &image).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn minimal_program() {
    let assembly = assemble_clean("stop");

    assert_eq!(assembly.object.code(), [(15 << 11) | 0b100]);
    assert_eq!(assembly.object.dc(), 0);
    assert_eq!(
        object_text(assembly.object.code(), assembly.object.data()),
        "1 0\n0100 74004\n"
    );
    assert!(assembly.entries.is_empty());
    assert!(assembly.externals.is_empty());
}

#[test]
fn two_register_operands_share_a_word() {
    let assembly = assemble_clean("mov r3, r4");

    assert_eq!(
        assembly.object.code(),
        [
            make_instruction_word(Opcode::MOV, Some(DirectRegister), Some(DirectRegister)),
            (3 << 6) | (4 << 3) | 0b100,
        ]
    );
}

#[test]
fn register_and_indirect_register_share_a_word() {
    let assembly = assemble_clean("mov *r2, r5");

    assert_eq!(
        assembly.object.code(),
        [
            make_instruction_word(Opcode::MOV, Some(IndirectRegister), Some(DirectRegister)),
            make_register_pair_word("r2".parse().unwrap(), "r5".parse().unwrap()),
        ]
    );
}

#[test]
fn mixed_operands_take_separate_words() {
    let assembly = assemble_clean("cmp #-1, r2");

    assert_eq!(
        assembly.object.code(),
        [
            make_instruction_word(Opcode::CMP, Some(Immediate), Some(DirectRegister)),
            (0xFFF << 3) | 0b100,
            (2 << 3) | 0b100,
        ]
    );
}

#[test]
fn direct_symbol_is_patched_in_the_second_pass() {
    let assembly = assemble_clean("mov X, r1\nX: .data 7");

    // IC ends at 3, so X lands at 100 + 3 + 0 = 103.
    assert_eq!(
        assembly.object.code(),
        [
            make_instruction_word(Opcode::MOV, Some(Direct), Some(DirectRegister)),
            (103 << 3) | 0b010,
            (1 << 3) | 0b100,
        ]
    );
    assert_eq!(assembly.object.data(), [7]);
}

#[test]
fn data_symbols_relocate_behind_the_code() {
    let assembly = assemble_clean("mov STR, r1\nstop\nSTR: .string \"ab\"");

    // IC ends at 4, STR is at data position 0 -> address 104.
    assert_eq!(assembly.object.code()[1], (104 << 3) | 0b010);
    assert_eq!(assembly.object.data(), [0x61, 0x62, 0]);
}

#[test]
fn extern_reference_stays_zero_and_is_recorded() {
    let assembly = assemble_clean(".extern Y\njmp Y");

    assert_eq!(
        assembly.object.code(),
        [
            make_instruction_word(Opcode::JMP, None, Some(Direct)),
            0,
        ]
    );

    let usages = assembly.externals.usages();
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].name, "Y");
    assert_eq!(usages[0].occurrences, [101]);

    let mut buffer = Vec::new();
    obfile::write_externals(&mut buffer, &assembly.externals).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "Y 0101\n");
}

#[test]
fn extern_referenced_from_both_operands() {
    let assembly = assemble_clean(".extern IN\n.extern OUT\nmov IN, r1\nmov r1, OUT");

    let usages = assembly.externals.usages();
    assert_eq!(usages[0].name, "IN");
    assert_eq!(usages[0].occurrences, [101]);
    assert_eq!(usages[1].name, "OUT");
    // mov r1, OUT sits at code index 3; OUT's word is index 5.
    assert_eq!(usages[1].occurrences, [105]);
}

#[test]
fn entry_promotion() {
    let assembly = assemble_clean("MAIN: mov r3, r4\n.entry MAIN\nstop");

    assert_eq!(assembly.entries.len(), 1);
    assert_eq!(assembly.entries[0].name, "MAIN");
    assert_eq!(assembly.entries[0].address, 100);

    let mut buffer = Vec::new();
    obfile::write_entries(&mut buffer, &assembly.entries).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "MAIN 100\n");
}

#[test]
fn entry_of_a_data_symbol_uses_the_relocated_address() {
    let assembly = assemble_clean("stop\nLIST: .data 1, 2\n.entry LIST");

    assert_eq!(assembly.entries[0].address, 101);
}

#[test]
fn entry_extern_conflict_is_one_error() {
    let (count, reporter) = assemble_failing(".extern A\n.entry A\nstop");

    assert_eq!(count, 1);
    assert_eq!(reporter.errors(), 1);
    assert!(reporter.diagnostics[0].message.contains("extern"));
}

#[test]
fn misplaced_data_comma_is_one_error() {
    let (count, _) = assemble_failing(".data 1,,2\nstop");
    assert_eq!(count, 1);
}

#[test]
fn entry_list_requires_commas() {
    let (count, _) = assemble_failing("M: stop\nN: stop\n.entry M N");
    assert_eq!(count, 1);
}

#[test]
fn undefined_symbol_is_reported_in_the_second_pass() {
    let (count, reporter) = assemble_failing("jmp NOWHERE");

    assert_eq!(count, 1);
    assert!(reporter.diagnostics[0].message.contains("NOWHERE"));
}

#[test]
fn duplicate_label_is_rejected() {
    let (count, _) = assemble_failing("A: stop\nA: stop");
    assert_eq!(count, 1);
}

#[test]
fn duplicate_extern_declaration_is_rejected() {
    let (count, reporter) = assemble_failing(".extern B\n.extern B\nstop");

    assert_eq!(count, 1);
    assert!(reporter.diagnostics[0].message.contains("already defined"));
}

#[test]
fn label_before_extern_warns_and_is_ignored() {
    let assembly = assemble_clean("X: .extern Y\njmp Y\nstop");

    // The declaration still happened; the label did not.
    assert_eq!(assembly.externals.usages()[0].name, "Y");
    assert_eq!(assembly.externals.usages()[0].occurrences, [101]);
}

#[test]
fn immediate_boundaries() {
    let assembly = assemble_clean("cmp #-2048, #2047");

    assert_eq!(
        assembly.object.code(),
        [
            make_instruction_word(Opcode::CMP, Some(Immediate), Some(Immediate)),
            (0x800 << 3) | 0b100,
            (2047 << 3) | 0b100,
        ]
    );

    assert_eq!(assemble_failing("prn #2048").0, 1);
    assert_eq!(assemble_failing("prn #-2049").0, 1);
}

#[test]
fn data_boundaries() {
    let assembly = assemble_clean(".data 0, -1, 16384");
    assert_eq!(assembly.object.data(), [0x0000, 0x7FFF, 0x4000]);

    assert_eq!(assemble_failing(".data 16385\nstop").0, 1);
}

#[test]
fn empty_string_emits_one_zero_word() {
    let assembly = assemble_clean(".string \"\"\nstop");
    assert_eq!(assembly.object.data(), [0]);
}

#[test]
fn wrong_operand_count_is_rejected() {
    assert_eq!(assemble_failing("mov r1").0, 1);
    assert_eq!(assemble_failing("stop r1").0, 1);
}

#[test]
fn illegal_addressing_is_rejected() {
    assert_eq!(assemble_failing("lea #5, r1").0, 1);
    assert_eq!(assemble_failing("mov r1, #5").0, 1);
    assert_eq!(assemble_failing("jmp r1").0, 1);
}

#[test]
fn invalid_operand_is_rejected() {
    assert_eq!(assemble_failing("mov 5, r1").0, 1);
    assert_eq!(assemble_failing("inc *r9").0, 1);
}

#[test]
fn misplaced_colon_is_rejected() {
    let (count, reporter) = assemble_failing("foo:bar");

    assert_eq!(count, 1);
    assert!(reporter.diagnostics[0].message.contains("':'"));
}

#[test]
fn reserved_label_name_is_rejected() {
    assert_eq!(assemble_failing("r1: stop").0, 1);
    assert_eq!(assemble_failing("mov: stop").0, 1);
}

#[test]
fn over_long_line_is_rejected() {
    let line = format!("prn #1{}", " ".repeat(80));
    assert_eq!(assemble_failing(&line).0, 1);
}

#[test]
fn errors_accumulate_across_both_passes() {
    // Line 1: unknown instruction (pass 1).
    // Line 2: undefined symbol (pass 2).
    let (count, reporter) = assemble_failing("halt\njmp NOWHERE");

    assert_eq!(count, 2);
    assert_eq!(reporter.errors(), 2);
}

#[test]
fn uppercase_directive_is_rejected() {
    let (count, reporter) = assemble_failing(".DATA 1\nstop");

    assert_eq!(count, 1);
    assert!(reporter.diagnostics[0].message.contains("lowercase"));
}

#[test]
fn code_words_fit_in_fifteen_bits() {
    let assembly =
        assemble_clean("MAIN: add #2047, r7\nsub X, *r0\nX: .data -16384, 16384\nstop");

    for word in assembly.object.code().iter().chain(assembly.object.data()) {
        assert_eq!(word & 0x7FFF, *word);
    }
}

#[test]
fn full_pipeline_with_macros_comments_and_outputs() {
    let source = "\
; increment twice
macr m_incs
inc r1
inc r2
endmacr

MAIN: mov #5, r1
m_incs
.entry MAIN
END: stop
";
    let mut reporter = crate::CollectingReporter::new();
    let assembly = crate::assemble_source(source, "prog.as", &mut reporter).unwrap();

    // mov #5, r1 takes 3 words, each inc takes 2, stop takes 1.
    assert_eq!(assembly.object.ic(), 8);
    assert_eq!(assembly.entries[0].name, "MAIN");
    assert_eq!(assembly.entries[0].address, 100);
    assert_eq!(reporter.errors(), 0);
}

#[test]
fn labels_on_each_area_get_consistent_addresses() {
    let assembly = assemble_clean(
        "FIRST: mov r1, r2\nSECOND: stop\nD1: .data 5\nD2: .data 6\n.entry FIRST\n.entry SECOND\n.entry D1\n.entry D2",
    );

    let addresses: Vec<_> = assembly
        .entries
        .iter()
        .map(|entry| (entry.name.as_str(), entry.address))
        .collect();

    // IC ends at 3: mov takes 2 words, stop takes 1.
    assert_eq!(
        addresses,
        [("FIRST", 100), ("SECOND", 102), ("D1", 103), ("D2", 104)]
    );
}
