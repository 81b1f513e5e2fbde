fn main() {
    smartagri_lib::run()
}
