// Create the Error, ErrorKind, ResultExt, and Result types.
// Result is a typedef of std `Result` with the error type our own `Error`.
use error_chain::error_chain;

error_chain! {

    errors {
        InvalidGridDimensions(rows: usize, columns: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {} x {}: rows and columns must be positive and their product representable",
                    rows, columns)
        }
        UnknownDirection(name: String) {
            description("unknown compass direction")
            display("unknown compass direction '{}', expected one of north, south, east or west", name)
        }
        UnknownGenerator(name: String) {
            description("unknown maze generator")
            display("unknown maze generator '{}'", name)
        }
        UnknownSolver(name: String) {
            description("unknown maze solver")
            display("unknown maze solver '{}'", name)
        }
    }
}
