mod evaluator;
mod printer;
mod reader;

use evaluator::{Evaluator, InterpreterEvaluator};
use printer::{InterpreterPrinter, Printer};
use reader::{ReadOutput, Reader};

use crate::error::Result;

struct Repl<E: Evaluator, P: Printer> {
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn handle_line(&mut self, line: &str) -> Result<()> {
        let result = self.evaluator.evaluate(line);
        self.printer.print(result)?;
        Ok(())
    }

    fn run(mut self, mut reader: Reader) -> Result<()> {
        let result = loop {
            match reader.read() {
                Ok(ReadOutput::Exit) => break Ok(()),
                Ok(ReadOutput::Clear) => continue,
                Ok(ReadOutput::Line(line)) => {
                    if let Err(err) = self.handle_line(&line) {
                        break Err(err);
                    }
                }
                Err(err) => break Err(err),
            }
        };
        reader.save_history();
        result
    }
}

fn user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "there".to_owned())
}

pub fn start(banner: bool) -> Result<()> {
    if banner {
        println!(
            "Hello {}! This is the Leopard programming language!",
            user_name()
        );
        println!("Feel free to type in commands");
    }

    let reader = Reader::new()?;
    Repl {
        evaluator: InterpreterEvaluator::new(),
        printer: InterpreterPrinter::new(std::io::stdout()),
    }
    .run(reader)
}
