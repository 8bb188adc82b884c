//! Generates a JSON parser, mirroring the parsers the lexer tooling is
//! benchmarked against.

use descent::{generate, Target};
use pretty_assertions::assert_eq;

const JSON: &str = r#"
json ::= object | array
object ::= "{" pairs "}"
pairs ::= pair pairs_tail | "¬"
pair ::= <STRING> ":" value
pairs_tail ::= "," pairs | "¬"
value ::= <STRING> | <NUMBER> | <TRUE> | <FALSE> | <NULL> | object | array
array ::= "[" elements "]"
elements ::= value elements_tail | "¬"
elements_tail ::= "," elements | "¬"
"#;

/// Expected output, indented with four spaces for readability.
const JSON_PY: &str = r#"import subprocess
import sys
from typing import List

tokens: List[List[str]] = []

def generate_tokens(file: str):
    response = subprocess.run("cd lexer && make --silent && ./lexer " + file, shell=True)
    if response.returncode != 0:
        sys.exit(1)

def load_tokens():
    global tokens
    with open("lexer/out.jl") as f:
        tokens = [line.split("\x07") for line in f.read().splitlines()]

def peek() -> List[str]:
    if len(tokens) > 0:
        return tokens[0]
    return ["", "", ""]

def get_token() -> List[str]:
    if len(tokens) > 0:
        return tokens.pop(0)
    return ["", "", ""]

def expect(position: str, expected: str):
    print("Error: line", position, "- expected", expected)
    sys.exit(1)

def json():
    # json ::= object | array
    next_token: List[str]
    next_token = peek()
    if next_token[1] == "{":
        object()
    elif next_token[1] == "[":
        array()
    else:
        expect(next_token[2], "{,[")

def object():
    # object ::= "{" pairs "}"
    next_token: List[str]
    next_token = get_token()
    if next_token[1] == "{":
        pairs()
    else:
        expect(next_token[2], "{")
    next_token = get_token()
    if next_token[1] == "}":
        pass
    else:
        expect(next_token[2], "}")

def pairs():
    # pairs ::= pair pairs_tail | "¬"
    next_token: List[str]
    next_token = peek()
    if next_token[0] == "STRING":
        pair()
        pairs_tail()

def pair():
    # pair ::= <STRING> ":" value
    next_token: List[str]
    next_token = get_token()
    if next_token[0] == "STRING":
        pass
    else:
        expect(next_token[2], "STRING")
    next_token = get_token()
    if next_token[1] == ":":
        value()
    else:
        expect(next_token[2], ":")

def pairs_tail():
    # pairs_tail ::= "," pairs | "¬"
    next_token: List[str]
    next_token = peek()
    if next_token[1] == ",":
        get_token()
        pairs()

def value():
    # value ::= <STRING> | <NUMBER> | <TRUE> | <FALSE> | <NULL> | object | array
    next_token: List[str]
    next_token = peek()
    if next_token[0] == "STRING":
        get_token()
    elif next_token[0] == "NUMBER":
        get_token()
    elif next_token[0] == "TRUE":
        get_token()
    elif next_token[0] == "FALSE":
        get_token()
    elif next_token[0] == "NULL":
        get_token()
    elif next_token[1] == "{":
        object()
    elif next_token[1] == "[":
        array()
    else:
        expect(next_token[2], "STRING,NUMBER,TRUE,FALSE,NULL,{,[")

def array():
    # array ::= "[" elements "]"
    next_token: List[str]
    next_token = get_token()
    if next_token[1] == "[":
        elements()
    else:
        expect(next_token[2], "[")
    next_token = get_token()
    if next_token[1] == "]":
        pass
    else:
        expect(next_token[2], "]")

def elements():
    # elements ::= value elements_tail | "¬"
    next_token: List[str]
    next_token = peek()
    if next_token[0] == "STRING":
        value()
        elements_tail()
    elif next_token[0] == "NUMBER":
        value()
        elements_tail()
    elif next_token[0] == "TRUE":
        value()
        elements_tail()
    elif next_token[0] == "FALSE":
        value()
        elements_tail()
    elif next_token[0] == "NULL":
        value()
        elements_tail()
    elif next_token[1] == "{":
        value()
        elements_tail()
    elif next_token[1] == "[":
        value()
        elements_tail()

def elements_tail():
    # elements_tail ::= "," elements | "¬"
    next_token: List[str]
    next_token = peek()
    if next_token[1] == ",":
        get_token()
        elements()

def parse(file: str):
    generate_tokens(file)
    load_tokens()
    json()

def main():
    if len(sys.argv) < 2:
        print("usage: parser FILE")
        sys.exit(1)
    filename: str
    filename = sys.argv[1]
    parse(filename)
    next_token: List[str]
    next_token = get_token()
    if next_token[0] != "EOF":
        expect(next_token[2], "EOF")

if __name__ == "__main__":
    main()
"#;

#[test]
fn python_parser() {
    let out = generate(JSON, Target::Python).unwrap();
    assert_eq!(out, JSON_PY.replace("    ", "\t"));
}

#[test]
fn rust_parser() {
    let out = generate(JSON, Target::Rust).unwrap();

    for routine in &[
        "fn json (& mut self)",
        "fn pairs_tail (& mut self)",
        "fn elements_tail (& mut self)",
        "fn peek (& mut self) -> Token",
        "fn parse (& mut self , file : & str)",
        "pub fn main (& mut self)",
    ] {
        assert!(out.contains(routine), "missing {:?} in:\n{}", routine, out);
    }
    assert!(out.contains("struct Token"));
    assert!(out.contains("self . expect (& next_token . position , & \"STRING,NUMBER,TRUE,FALSE,NULL,{,[\")"));
}

#[test]
fn deterministic() {
    assert_eq!(
        generate(JSON, Target::Python).unwrap(),
        generate(JSON, Target::Python).unwrap()
    );
    assert_eq!(
        generate(JSON, Target::Rust).unwrap(),
        generate(JSON, Target::Rust).unwrap()
    );
}
