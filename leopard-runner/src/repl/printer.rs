use std::io::Write;

use super::evaluator::Evaluation;

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object) -> std::io::Result<()>;
}

pub struct InterpreterPrinter<W: Write> {
    out: W,
}

impl<W: Write> InterpreterPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Printer for InterpreterPrinter<W> {
    type Object = Evaluation;

    fn print(&mut self, object: Evaluation) -> std::io::Result<()> {
        match object {
            Evaluation::ParseErrors(errors) => {
                writeln!(self.out, "Parser errors:")?;
                for error in errors {
                    writeln!(self.out, "\t{}", error)?;
                }
            }
            Evaluation::Nothing => {}
            Evaluation::Value(value) => writeln!(self.out, "{}", value)?,
        }
        self.out.flush()
    }
}
